use super::DistributionFitter;
use crate::{
    models::{ModelType, ScalarModel, UniformModel},
    stats::DimensionStatistics,
};

/// Uniform distribution fitter.
///
/// The support is the observed range, optionally extended symmetrically by a
/// fraction of it. The score is discounted when the sample kurtosis sits
/// near the uniform value of 1.8 and inflated when it looks peaked.
#[derive(Clone, Debug)]
pub struct UniformFitter {
    extension: f64,
    bounds: Option<(f64, f64)>,
}

impl Default for UniformFitter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl UniformFitter {
    /// Construct a uniform fitter with no range extension.
    #[inline]
    pub fn new() -> Self {
        Self {
            extension: 0.,
            bounds: None,
        }
    }

    /// Set the symmetric range extension fraction, in [0, 0.5].
    #[inline]
    pub fn with_extension(mut self, extension: f64) -> Self {
        // Assert the extension fraction is in range.
        assert!(
            (0. ..=0.5).contains(&extension),
            "Extension fraction must be in [0, 0.5]."
        );
        // Set extension fraction.
        self.extension = extension;

        self
    }

    /// Force a fixed support, for known-bounded data.
    #[inline]
    pub fn with_bounds(mut self, lo: f64, hi: f64) -> Self {
        // Assert the bounds are ordered.
        assert!(lo < hi, "Support bounds must be ordered.");
        // Set forced bounds.
        self.bounds = Some((lo, hi));

        self
    }
}

impl DistributionFitter for UniformFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Uniform
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        let (lo, hi) = match self.bounds {
            Some(bounds) => bounds,
            None => {
                let pad = self.extension * statistics.range();

                (statistics.min() - pad, statistics.max() + pad)
            }
        };

        UniformModel::new(lo, hi).into()
    }

    fn adjust_score(
        &self,
        score: f64,
        statistics: &DimensionStatistics,
        _model: &ScalarModel,
    ) -> f64 {
        let kurtosis = statistics.kurtosis();

        // Flat-topped samples earn a bonus, peaked ones a penalty.
        if f64::abs(kurtosis - 1.8) < 0.5 {
            return score * 0.8;
        }
        if kurtosis > 2.5 {
            return score * 1.2;
        }

        score
    }
}
