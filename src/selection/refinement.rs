use log::{debug, trace};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{BestFitSelector, SelectionStrategy};
use crate::{
    estimators::{
        BetaFitter, CompositeFitter, DistributionFitter, EmpiricalFitter, FitResult, GammaFitter,
        NormalFitter, StudentTFitter, UniformFitter,
    },
    stats::{DimensionStatistics, ModeDetector, MomentAccumulator},
};

/// Iterative tiered refiner.
///
/// Alternative to the one-shot selector: tiers are tried in order and the
/// first one that passes wins.
///
/// 1. Simple parametric (Normal, Uniform).
/// 2. Extended parametric (Beta, Gamma, Student's t).
/// 3. Composite with a growing component budget, k = 2..K.
/// 4. Empirical, always accepted.
///
/// Parametric tiers pass when the KS score clears a threshold and round-trip
/// verification holds: synthetic points are drawn from the fitted model with
/// a seeded generator, the same family is re-fitted to them, and every
/// parameter must drift by less than the tolerance.
#[derive(Clone, Debug)]
pub struct IterativeRefiner {
    max_components: usize,
    parametric_threshold: f64,
    composite_threshold: f64,
    drift_tolerance: f64,
    seed: u64,
}

impl Default for IterativeRefiner {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl IterativeRefiner {
    /// Construct a refiner with thresholds 0.03 (parametric), 0.05
    /// (composite), drift tolerance 2% and component budget 4.
    #[inline]
    pub fn new() -> Self {
        Self {
            max_components: 4,
            parametric_threshold: 0.03,
            composite_threshold: 0.05,
            drift_tolerance: 0.02,
            seed: 42,
        }
    }

    /// Set the maximum composite component budget.
    #[inline]
    pub fn with_max_components(mut self, max_components: usize) -> Self {
        // Assert the budget admits a mixture.
        assert!(max_components >= 2, "Component budget must be at least two.");
        // Set component budget.
        self.max_components = max_components;

        self
    }

    /// Set the parametric acceptance threshold.
    #[inline]
    pub fn with_parametric_threshold(mut self, parametric_threshold: f64) -> Self {
        // Set parametric threshold.
        self.parametric_threshold = parametric_threshold;

        self
    }

    /// Set the composite acceptance threshold.
    #[inline]
    pub fn with_composite_threshold(mut self, composite_threshold: f64) -> Self {
        // Set composite threshold.
        self.composite_threshold = composite_threshold;

        self
    }

    /// Set the round-trip drift tolerance.
    #[inline]
    pub fn with_drift_tolerance(mut self, drift_tolerance: f64) -> Self {
        // Assert the tolerance is positive.
        assert!(drift_tolerance > 0., "Drift tolerance must be positive.");
        // Set drift tolerance.
        self.drift_tolerance = drift_tolerance;

        self
    }

    /// Set the verification seed.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        // Set seed.
        self.seed = seed;

        self
    }

    /// Refine one dimension through the tier ladder.
    pub fn refine(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> FitResult {
        // Tier 1: simple parametric.
        let tier: Vec<Box<dyn DistributionFitter>> =
            vec![Box::new(NormalFitter::new()), Box::new(UniformFitter::new())];
        if let Some(result) = self.parametric_tier(&tier, statistics, sorted) {
            debug!("dimension {}: simple parametric tier accepted", statistics.index());
            return result;
        }

        // Tier 2: extended parametric.
        let tier: Vec<Box<dyn DistributionFitter>> = vec![
            Box::new(BetaFitter::new()),
            Box::new(GammaFitter::new()),
            Box::new(StudentTFitter::new()),
        ];
        if let Some(result) = self.parametric_tier(&tier, statistics, sorted) {
            debug!("dimension {}: extended parametric tier accepted", statistics.index());
            return result;
        }

        // Tier 3: composite with a growing component budget.
        for k in 2..=self.max_components {
            let fitter = CompositeFitter::new(ModeDetector::new(k), BestFitSelector::parametric());
            if let Some(result) = fitter.fit(statistics, sorted) {
                if result.score() <= self.composite_threshold {
                    debug!(
                        "dimension {}: composite tier accepted with {} components",
                        statistics.index(),
                        k
                    );
                    return result;
                }
            }
        }

        // Tier 4: empirical, always accepted.
        debug!("dimension {}: falling through to empirical", statistics.index());
        EmpiricalFitter::new()
            .fit(statistics, sorted)
            .expect("Empirical fitting never fails")
    }

    /// Best passing candidate within a parametric tier, if any.
    fn parametric_tier(
        &self,
        tier: &[Box<dyn DistributionFitter>],
        statistics: &DimensionStatistics,
        sorted: &[f64],
    ) -> Option<FitResult> {
        tier.iter()
            .filter_map(|fitter| {
                let result = fitter.fit(statistics, sorted)?;
                let passes = result.score() <= self.parametric_threshold
                    && self.verify(fitter.as_ref(), &result, statistics);

                passes.then_some(result)
            })
            .min_by(|a, b| a.score().total_cmp(&b.score()))
    }

    /// Round-trip verification of a fitted model.
    fn verify(
        &self,
        fitter: &dyn DistributionFitter,
        result: &FitResult,
        statistics: &DimensionStatistics,
    ) -> bool {
        // Draw a synthetic sample of the original size, deterministically.
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let mut synthetic = result.model().sample_n(&mut rng, statistics.n());
        synthetic.sort_unstable_by(f64::total_cmp);

        // Re-fit the same family to the synthetic sample.
        let mut accumulator = MomentAccumulator::new();
        accumulator.extend(&synthetic);
        let synthetic_statistics = accumulator.statistics(statistics.index());
        let refitted = fitter.estimate(&synthetic_statistics, &synthetic);

        // Compare parameters pairwise; a shape change (e.g. truncation
        // appearing) counts as drift.
        let original = result.model().parameters();
        let recovered = refitted.parameters();
        if original.len() != recovered.len() {
            trace!("verification failed: parameter shapes differ");
            return false;
        }

        let scale = f64::max(statistics.std_dev(), 1e-9);
        original.iter().zip(&recovered).all(|((name, a), (_, b))| {
            let drift = f64::abs(b - a);
            let passed = drift <= self.drift_tolerance * f64::max(f64::abs(*a), scale);
            if !passed {
                trace!("verification failed: {} drifted by {}", name, drift);
            }

            passed
        })
    }
}

impl SelectionStrategy for IterativeRefiner {
    #[inline]
    fn select(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> FitResult {
        self.refine(statistics, sorted)
    }
}
