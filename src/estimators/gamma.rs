use super::DistributionFitter;
use crate::{
    models::{GammaModel, ModelType, ScalarModel},
    stats::DimensionStatistics,
};

/// Gamma distribution fitter.
///
/// Method of moments on positive data, shifting the support onto the sample
/// minimum when the data dips below zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct GammaFitter;

impl GammaFitter {
    /// Construct a gamma fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DistributionFitter for GammaFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Gamma
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        // Shift the support when data extends below zero.
        let location = match statistics.min() >= 0. {
            true => 0.,
            false => statistics.min() - 1e-6 * f64::max(1., statistics.range()),
        };

        let mean = statistics.mean() - location;
        let variance = statistics.variance();

        // Degenerate moments fall back to a wide exponential-like model.
        if mean <= 0. || variance <= 0. {
            return GammaModel::new(1., f64::max(statistics.range(), 1.), statistics.min()).into();
        }

        // Method of moments: k = m^2 / v, theta = v / m.
        let shape = f64::max(mean * mean / variance, 1e-3);
        let scale = variance / mean;

        GammaModel::new(shape, scale, location).into()
    }
}
