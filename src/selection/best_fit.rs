use itertools::Itertools;
use log::{debug, trace};

use super::SelectionStrategy;
use crate::{
    estimators::{
        BetaFitter, BetaPrimeFitter, CompositeFitter, DistributionFitter, EmpiricalFitter,
        FitResult, GammaFitter, InverseGammaFitter, NormalFitter, PearsonIvFitter, StudentTFitter,
        UniformFitter,
    },
    models::ModelType,
    stats::{DimensionStatistics, ModeDetector},
};

/// Mode bound used by the prebuilt multimodal panels.
const PANEL_K_MAX: usize = 4;

/// Best-fit model selector.
///
/// Runs a configured panel of fitters, penalizes the empirical fallback,
/// then applies a relative-threshold simplicity bias: among every candidate
/// whose score is within `(1 + S)` of the raw best, the simplest family
/// wins. Complexity ties fall back to the raw best.
#[derive(Clone, Debug)]
pub struct BestFitSelector {
    fitters: Vec<Box<dyn DistributionFitter>>,
    empirical_penalty: f64,
    simplicity_margin: f64,
}

impl BestFitSelector {
    /// Construct a selector over a non-empty panel of fitters.
    pub fn new(fitters: Vec<Box<dyn DistributionFitter>>) -> Self {
        // Assert the panel is not empty.
        assert!(!fitters.is_empty(), "Selector requires at least one fitter.");

        Self {
            fitters,
            empirical_penalty: 0.02,
            simplicity_margin: 0.5,
        }
    }

    /// Set the penalty added to empirical-tagged scores before comparison.
    #[inline]
    pub fn with_empirical_penalty(mut self, empirical_penalty: f64) -> Self {
        // Assert the penalty is non-negative.
        assert!(empirical_penalty >= 0., "Empirical penalty must be non-negative.");
        // Set empirical penalty.
        self.empirical_penalty = empirical_penalty;

        self
    }

    /// Set the relative simplicity margin S.
    #[inline]
    pub fn with_simplicity_margin(mut self, simplicity_margin: f64) -> Self {
        // Assert the margin is non-negative.
        assert!(simplicity_margin >= 0., "Simplicity margin must be non-negative.");
        // Set simplicity margin.
        self.simplicity_margin = simplicity_margin;

        self
    }

    /// The model families of the configured panel, in panel order.
    pub fn model_types(&self) -> Vec<ModelType> {
        self.fitters.iter().map(|f| f.model_type()).collect()
    }

    /// Run the panel and pick the winner, exposing the per-fitter penalized
    /// score vector for diagnostics (infinite where a fitter failed).
    pub fn select_all(
        &self,
        statistics: &DimensionStatistics,
        sorted: &[f64],
    ) -> (FitResult, Vec<f64>) {
        // Run every configured fitter, dropping failures.
        let results: Vec<Option<FitResult>> = self
            .fitters
            .iter()
            .map(|f| f.fit(statistics, sorted))
            .collect();

        // Penalize the empirical fallback before comparison.
        let scores: Vec<f64> = results
            .iter()
            .map(|r| match r {
                Some(r) if r.model_type().is_empirical() => r.score() + self.empirical_penalty,
                Some(r) => r.score(),
                None => f64::INFINITY,
            })
            .collect();

        trace!("dimension {}: panel scores {:?}", statistics.index(), scores);

        // Last resort: every fitter failed, assign the empirical model.
        if results.iter().all(Option::is_none) {
            debug!("dimension {}: all fitters failed, falling back to empirical", statistics.index());
            let fallback = EmpiricalFitter::new()
                .fit(statistics, sorted)
                .expect("Empirical fitting never fails");

            return (fallback, scores);
        }

        // Find the raw best by minimum penalized score.
        let raw_best = scores
            .iter()
            .position_min_by(|a, b| a.total_cmp(b))
            .expect("Panel is non-empty");
        let threshold = scores[raw_best] * (1. + self.simplicity_margin);

        // Among candidates within the threshold, prefer the simplest family.
        let candidates: Vec<usize> = (0..scores.len())
            .filter(|&i| results[i].is_some() && scores[i] <= threshold)
            .collect();
        let simplest = candidates
            .iter()
            .copied()
            .min_by_key(|&i| self.fitters[i].model_type().complexity())
            .expect("Raw best is always a candidate");

        // Complexity ties fall back to the raw best.
        let tied = candidates
            .iter()
            .filter(|&&i| {
                self.fitters[i].model_type().complexity()
                    == self.fitters[simplest].model_type().complexity()
            })
            .count();
        let winner = match tied == 1 {
            true => simplest,
            false => raw_best,
        };

        debug!(
            "dimension {}: selected {} with score {}",
            statistics.index(),
            self.fitters[winner].model_type(),
            scores[winner]
        );

        (
            results[winner].clone().expect("Winner is a candidate"),
            scores,
        )
    }

    /* Prebuilt panels. */

    /// Default panel: Normal, Uniform, Empirical.
    pub fn default_panel() -> Self {
        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(EmpiricalFitter::new()),
        ])
    }

    /// Parametric-only panel: Normal, Uniform, Beta, Gamma, Student's t.
    pub fn parametric() -> Self {
        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(BetaFitter::new()),
            Box::new(GammaFitter::new()),
            Box::new(StudentTFitter::new()),
        ])
    }

    /// Bounded-data panel: Normal, Beta, Uniform.
    pub fn bounded() -> Self {
        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(BetaFitter::new()),
            Box::new(UniformFitter::new()),
        ])
    }

    /// Normalized-vectors panel: the default panel with [-1, 1] bounds
    /// injected into the bounded families.
    pub fn normalized() -> Self {
        Self::new(vec![
            Box::new(NormalFitter::new().with_bounds(-1., 1.)),
            Box::new(UniformFitter::new().with_bounds(-1., 1.)),
            Box::new(EmpiricalFitter::new()),
        ])
    }

    /// Full-Pearson panel: every parametric family plus the empirical
    /// fallback.
    pub fn full_pearson() -> Self {
        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(BetaFitter::new()),
            Box::new(GammaFitter::new()),
            Box::new(StudentTFitter::new()),
            Box::new(InverseGammaFitter::new()),
            Box::new(BetaPrimeFitter::new()),
            Box::new(PearsonIvFitter::new()),
            Box::new(EmpiricalFitter::new()),
        ])
    }

    /// Multimodal-aware default panel; the composite fitter's component
    /// selector is the default panel without its empirical fallback.
    pub fn multimodal() -> Self {
        let components = Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
        ]);

        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(EmpiricalFitter::new()),
            Box::new(CompositeFitter::new(ModeDetector::new(PANEL_K_MAX), components)),
        ])
    }

    /// Multimodal-aware full-Pearson panel; the component selector is the
    /// full parametric family.
    pub fn multimodal_full_pearson() -> Self {
        let components = Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(BetaFitter::new()),
            Box::new(GammaFitter::new()),
            Box::new(StudentTFitter::new()),
            Box::new(InverseGammaFitter::new()),
            Box::new(BetaPrimeFitter::new()),
            Box::new(PearsonIvFitter::new()),
        ]);

        Self::new(vec![
            Box::new(NormalFitter::new()),
            Box::new(UniformFitter::new()),
            Box::new(BetaFitter::new()),
            Box::new(GammaFitter::new()),
            Box::new(StudentTFitter::new()),
            Box::new(InverseGammaFitter::new()),
            Box::new(BetaPrimeFitter::new()),
            Box::new(PearsonIvFitter::new()),
            Box::new(EmpiricalFitter::new()),
            Box::new(CompositeFitter::new(ModeDetector::new(PANEL_K_MAX), components)),
        ])
    }
}

impl SelectionStrategy for BestFitSelector {
    #[inline]
    fn select(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> FitResult {
        self.select_all(statistics, sorted).0
    }

    #[inline]
    fn select_scored(
        &self,
        statistics: &DimensionStatistics,
        sorted: &[f64],
    ) -> (FitResult, Option<Vec<f64>>) {
        let (result, scores) = self.select_all(statistics, sorted);

        (result, Some(scores))
    }

    #[inline]
    fn fitter_count(&self) -> usize {
        self.fitters.len()
    }
}
