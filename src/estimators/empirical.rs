use super::DistributionFitter;
use crate::{
    models::{EmpiricalModel, ModelType, ScalarModel},
    stats::DimensionStatistics,
};

/// Histogram-backed empirical fitter, the fallback of last resort.
///
/// The bin count follows Sturges' rule clamped to [10, 100]. The score is a
/// fixed base penalty, expressing the preference for parametric models, plus
/// the deviation between the raw empirical CDF and the linearized histogram
/// CDF (typically tiny).
#[derive(Clone, Debug)]
pub struct EmpiricalFitter {
    base_penalty: f64,
}

impl Default for EmpiricalFitter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EmpiricalFitter {
    /// Construct an empirical fitter with base penalty 0.02.
    #[inline]
    pub fn new() -> Self {
        Self { base_penalty: 0.02 }
    }

    /// Set the base penalty.
    #[inline]
    pub fn with_base_penalty(mut self, base_penalty: f64) -> Self {
        // Assert the penalty is non-negative.
        assert!(base_penalty >= 0., "Base penalty must be non-negative.");
        // Set base penalty.
        self.base_penalty = base_penalty;

        self
    }
}

impl DistributionFitter for EmpiricalFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Empirical
    }

    fn estimate(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> ScalarModel {
        let n = sorted.len();
        let (min, max) = (statistics.min(), statistics.max());

        // A constant sample degenerates to a single step.
        if max <= min {
            return EmpiricalModel::new(vec![min, max], vec![0., 1.]).into();
        }

        // Sturges' rule, clamped.
        let bins = (f64::ceil(f64::log2(n as f64)) as usize + 1).clamp(10, 100);
        let width = (max - min) / bins as f64;

        // Equal-width boundaries.
        let boundaries: Vec<f64> = (0..=bins).map(|i| min + i as f64 * width).collect();

        // Count samples per bin.
        let mut counts = vec![0usize; bins];
        for &v in sorted {
            let bin = usize::min(((v - min) / width) as usize, bins - 1);
            counts[bin] += 1;
        }

        EmpiricalModel::from_counts(boundaries, &counts).into()
    }

    #[inline]
    fn adjust_score(
        &self,
        score: f64,
        _statistics: &DimensionStatistics,
        _model: &ScalarModel,
    ) -> f64 {
        score + self.base_penalty
    }
}
