use super::DistributionFitter;
use crate::{
    models::{ModelType, ScalarModel, StudentTModel},
    stats::DimensionStatistics,
};

/// Student's t distribution fitter.
///
/// The degrees of freedom come from the excess kurtosis of the sample:
///
/// ```text
///     \nu = 4 + 6 / (\beta_2 - 3)
/// ```
///
/// clamped to [4.01, 100]; the scale follows from the variance of the t
/// distribution, \sigma^2 = \nu / (\nu - 2) * s^2.
#[derive(Clone, Copy, Debug, Default)]
pub struct StudentTFitter;

impl StudentTFitter {
    /// Construct a Student's t fitter.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl DistributionFitter for StudentTFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::StudentT
    }

    fn estimate(&self, statistics: &DimensionStatistics, _sorted: &[f64]) -> ScalarModel {
        // Excess kurtosis maps to degrees of freedom; light tails push the
        // estimate toward the normal limit.
        let excess = statistics.excess_kurtosis();
        let dof = match excess > 0. {
            true => f64::clamp(4. + 6. / excess, 4.01, 100.),
            false => 100.,
        };

        // Scale from variance; degenerate variance falls back wide.
        let scale = match statistics.variance() > 0. {
            true => f64::sqrt(statistics.variance() * (dof - 2.) / dof),
            false => f64::max(statistics.range(), 1.),
        };

        StudentTModel::new(dof, statistics.mean(), scale).into()
    }

    fn adjust_score(
        &self,
        score: f64,
        statistics: &DimensionStatistics,
        model: &ScalarModel,
    ) -> f64 {
        let ScalarModel::StudentT(model) = model else {
            return score;
        };

        let dof = model.degrees_of_freedom();

        // Genuinely heavy tails earn a bonus; as the estimate approaches
        // the normal limit the penalty escalates.
        let mut score = match dof < 10. {
            true => score * 0.85,
            false => score * (1. + 0.5 * (dof - 10.) / 90.),
        };

        // The t family is symmetric; skewed samples are penalized.
        if f64::abs(statistics.skewness()) > 0.3 {
            score *= 1.2;
        }

        score
    }
}
