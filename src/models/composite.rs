use serde::{Deserialize, Serialize};

use super::ScalarModel;
use crate::functions::invert_cdf;

/// One weighted component of a composite model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeComponent {
    /// Mixture weight of the component.
    pub weight: f64,
    /// The component model.
    pub model: ScalarModel,
}

/// Weighted mixture of scalar models.
///
/// Components are stored in canonical order (ascending characteristic
/// location) with weights normalized to sum to one, so equivalent mixtures
/// round-trip to equal representations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeModel {
    components: Vec<CompositeComponent>,
}

impl CompositeModel {
    /// Construct a composite model from weighted components.
    pub fn new(components: Vec<(f64, ScalarModel)>) -> Self {
        // Assert there is at least one component.
        assert!(!components.is_empty(), "Composite must have at least one component.");
        // Assert all weights are strictly positive.
        assert!(
            components.iter().all(|(w, _)| *w > 0.),
            "Component weights must be strictly positive."
        );

        // Normalize weights to unit mass.
        let total: f64 = components.iter().map(|(w, _)| w).sum();
        let mut components: Vec<CompositeComponent> = components
            .into_iter()
            .map(|(weight, model)| CompositeComponent {
                weight: weight / total,
                model,
            })
            .collect();

        // Canonical order: ascending characteristic location.
        components.sort_by(|a, b| a.model.location().total_cmp(&b.model.location()));

        Self { components }
    }

    /// The ordered components.
    #[inline]
    pub fn components(&self) -> &[CompositeComponent] {
        &self.components
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the mixture has no components; always false by construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Sum of component weights; one within 1e-9 by construction.
    #[inline]
    pub fn weight_sum(&self) -> f64 {
        self.components.iter().map(|c| c.weight).sum()
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        self.components
            .iter()
            .map(|c| c.weight * c.model.cdf(x))
            .sum()
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        // Bracket with the extreme component quantiles, then bisect the
        // mixture CDF.
        let lo = self
            .components
            .iter()
            .map(|c| c.model.inverse_cdf(1e-6))
            .fold(f64::INFINITY, f64::min);
        let hi = self
            .components
            .iter()
            .map(|c| c.model.inverse_cdf(1. - 1e-6))
            .fold(f64::NEG_INFINITY, f64::max);

        invert_cdf(|x| self.cdf(x), lo, hi, u)
    }

    /// Named parameters: the component weights.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.components.iter().map(|c| ("weight", c.weight)).collect()
    }

    /// Number of free parameters: component parameters plus the free
    /// mixture weights.
    pub fn parameter_count(&self) -> usize {
        let children: usize = self.components.iter().map(|c| c.model.parameter_count()).sum();

        children + (self.components.len() - 1)
    }

    /// Characteristic location: the weighted component location.
    pub fn location(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.weight * c.model.location())
            .sum()
    }
}
