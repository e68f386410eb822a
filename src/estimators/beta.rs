use super::DistributionFitter;
use crate::{
    models::{BetaModel, ModelType, ScalarModel},
    stats::DimensionStatistics,
};

/// Beta distribution fitter.
///
/// Method of moments on the sample standardized to the unit interval. Only
/// the standardized mean is clamped before the moment match; per-sample
/// values are never clamped, preserving the variance contribution of
/// near-boundary samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct BetaFitter;

impl BetaFitter {
    /// Construct a beta fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Skewness of a beta distribution with the given shapes.
    fn predicted_skewness(alpha: f64, beta: f64) -> f64 {
        2. * (beta - alpha) * f64::sqrt(alpha + beta + 1.)
            / ((alpha + beta + 2.) * f64::sqrt(alpha * beta))
    }
}

impl DistributionFitter for BetaFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Beta
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        let range = statistics.range();

        // Degenerate range falls back to a flat unit-wide model.
        if range <= 0. {
            return BetaModel::new(1., 1., statistics.min(), statistics.min() + 1.).into();
        }

        // Standardize moments to the unit interval, clamping the mean only.
        let mean = f64::clamp((statistics.mean() - statistics.min()) / range, 1e-6, 1. - 1e-6);
        let variance = statistics.variance() / (range * range);

        // Method of moments; a non-positive concentration falls back flat.
        let concentration = match variance > 0. {
            true => mean * (1. - mean) / variance - 1.,
            false => 0.,
        };
        if concentration <= 0. {
            return BetaModel::new(1., 1., statistics.min(), statistics.max()).into();
        }

        let mut alpha = f64::max(mean * concentration, 0.1);
        let mut beta = f64::max((1. - mean) * concentration, 0.1);

        // Snap to the flat model when both shapes hover around one.
        if f64::abs(alpha - 1.) < 0.15 && f64::abs(beta - 1.) < 0.15 {
            alpha = 1.;
            beta = 1.;
        }

        BetaModel::new(alpha, beta, statistics.min(), statistics.max()).into()
    }

    fn adjust_score(
        &self,
        score: f64,
        statistics: &DimensionStatistics,
        model: &ScalarModel,
    ) -> f64 {
        let ScalarModel::Beta(model) = model else {
            return score;
        };

        let mut score = score;

        // U-shaped fits earn a bonus.
        if model.alpha() < 1. && model.beta() < 1. {
            score *= 0.85;
        }

        // Matching the sample skewness earns a bonus.
        let predicted = Self::predicted_skewness(model.alpha(), model.beta());
        if f64::abs(predicted - statistics.skewness()) < 0.3 {
            score *= 0.9;
        }

        // Symmetric mesokurtic samples are normal territory.
        if f64::abs(statistics.skewness()) < 0.1 && f64::abs(statistics.kurtosis() - 3.) < 0.2 {
            score *= 1.25;
        }

        score
    }
}
