use super::{DistributionFitter, FitResult, SUPPORT_MISMATCH_SCORE};
use crate::{
    models::{InverseGammaModel, ModelType, ScalarModel},
    stats::{ks_statistic, DimensionStatistics},
};

/// Inverse-Gamma distribution fitter.
///
/// Method of moments on strictly positive data:
///
/// ```text
///     \alpha = m^2 / v + 2,  \beta = m (\alpha - 1)
/// ```
///
/// A sample extending to or below zero is outside the support; the fit then
/// reports a default-parameter model with a fixed large-but-finite score.
#[derive(Clone, Copy, Debug, Default)]
pub struct InverseGammaFitter;

impl InverseGammaFitter {
    /// Construct an inverse-gamma fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// The default-parameter model reported on support mismatch.
    #[inline]
    fn default_model() -> InverseGammaModel {
        InverseGammaModel::new(3., 1.)
    }
}

impl DistributionFitter for InverseGammaFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::InverseGamma
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        let mean = statistics.mean();
        let variance = statistics.variance();

        // Outside the support or degenerate: report the default model.
        if statistics.min() <= 0. || mean <= 0. || variance <= 0. {
            return Self::default_model().into();
        }

        let alpha = mean * mean / variance + 2.;
        let beta = mean * (alpha - 1.);

        InverseGammaModel::new(alpha, beta).into()
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
