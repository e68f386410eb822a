use super::{DistributionFitter, FitResult, SUPPORT_MISMATCH_SCORE};
use crate::{
    models::{BetaPrimeModel, ModelType, ScalarModel},
    stats::{ks_statistic, DimensionStatistics},
};

/// Beta-Prime distribution fitter.
///
/// Method of moments on strictly positive data. From m = \alpha / (\beta - 1)
/// and v = m (m + 1) / (\beta - 2):
///
/// ```text
///     \beta = m (m + 1) / v + 2,  \alpha = m (\beta - 1)
/// ```
///
/// which keeps \beta > 2, so the fitted model always has finite variance. A
/// sample extending to or below zero reports a default-parameter model with
/// a fixed large-but-finite score.
#[derive(Clone, Copy, Debug, Default)]
pub struct BetaPrimeFitter;

impl BetaPrimeFitter {
    /// Construct a beta-prime fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// The default-parameter model reported on support mismatch.
    #[inline]
    fn default_model() -> BetaPrimeModel {
        BetaPrimeModel::new(1., 3.)
    }
}

impl DistributionFitter for BetaPrimeFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::BetaPrime
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        let mean = statistics.mean();
        let variance = statistics.variance();

        // Outside the support or degenerate: report the default model.
        if statistics.min() <= 0. || mean <= 0. || variance <= 0. {
            return Self::default_model().into();
        }

        let beta = mean * (mean + 1.) / variance + 2.;
        let alpha = mean * (beta - 1.);

        BetaPrimeModel::new(alpha, beta).into()
    }

    fn fit(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> Option<FitResult> {
        // Assert the sample is not empty.
        assert!(!sorted.is_empty(), "Cannot fit an empty sample.");

        // Support mismatch: fixed penalty score, no KS computation.
        if statistics.min() <= 0. {
            return Some(FitResult::new(
                Self::default_model().into(),
                SUPPORT_MISMATCH_SCORE,
            ));
        }

        let model = self.estimate(statistics, sorted);
        let score = ks_statistic(sorted, |x| model.cdf(x));

        Some(FitResult::new(model, score))
    }
}
