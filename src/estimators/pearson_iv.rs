use super::DistributionFitter;
use crate::{
    models::{ModelType, PearsonIvModel, ScalarModel},
    stats::DimensionStatistics,
};

/// Pearson type IV distribution fitter.
///
/// Moment-based estimation through the auxiliary quantity
///
/// ```text
///     r = 6 (\beta_2 - \beta_1 - 1) / (2\beta_2 - 3\beta_1 - 6)
/// ```
///
/// with m = (r + 2) / 2, and skew and scale derived from the discriminant
/// 16 (r - 1) - \beta_1 (r - 2)^2. Used only in full-Pearson panels.
#[derive(Clone, Copy, Debug, Default)]
pub struct PearsonIvFitter;

impl PearsonIvFitter {
    /// Construct a Pearson type IV fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Wide fallback for samples whose moments leave the type IV region.
    fn fallback(statistics: &DimensionStatistics) -> PearsonIvModel {
        let scale = match statistics.std_dev() > 0. {
            true => statistics.std_dev(),
            false => f64::max(statistics.range(), 1.),
        };

        PearsonIvModel::new(2., 0., scale, statistics.mean())
    }
}

impl DistributionFitter for PearsonIvFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::PearsonIv
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        let beta1 = statistics.skewness() * statistics.skewness();
        let beta2 = statistics.kurtosis();
        let sigma = statistics.std_dev();

        let denominator = 2. * beta2 - 3. * beta1 - 6.;
        if f64::abs(denominator) < 1e-9 || sigma <= 0. {
            return Self::fallback(statistics).into();
        }

        let r = 6. * (beta2 - beta1 - 1.) / denominator;
        let m = (r + 2.) / 2.;
        let discriminant = 16. * (r - 1.) - beta1 * (r - 2.) * (r - 2.);

        // The moment map is only valid inside the type IV region.
        if m <= 0.51 || discriminant <= 0. {
            return Self::fallback(statistics).into();
        }

        let nu = f64::clamp(
            -r * (r - 2.) * statistics.skewness() / f64::sqrt(discriminant),
            -50.,
            50.,
        );
        let a = sigma * f64::sqrt(discriminant) / 4.;

        // Center so the model mean matches the sample mean.
        let lambda = match m > 1. {
            true => statistics.mean() + a * nu / (2. * m - 2.),
            false => statistics.mean(),
        };

        PearsonIvModel::new(m, nu, a, lambda).into()
    }
}
