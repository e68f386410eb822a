use serde::{Deserialize, Serialize};

use crate::{
    models::{ModelType, ScalarModel},
    stats::{ks_statistic, DimensionStatistics},
};

mod beta;
pub use beta::*;

mod beta_prime;
pub use beta_prime::*;

mod composite;
pub use composite::*;

mod empirical;
pub use empirical::*;

mod gamma;
pub use gamma::*;

mod inverse_gamma;
pub use inverse_gamma::*;

mod normal;
pub use normal::*;

mod pearson_iv;
pub use pearson_iv::*;

mod student_t;
pub use student_t::*;

mod uniform;
pub use uniform::*;

/// Fixed large-but-finite score assigned when a sample lies outside a
/// fitter's support, so selection naturally excludes the candidate.
pub const SUPPORT_MISMATCH_SCORE: f64 = 0.9;

/// A scored fit: the estimated model and its goodness-of-fit score.
///
/// Lower scores are better. Scores are non-negative and never NaN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    model: ScalarModel,
    score: f64,
}

impl FitResult {
    /// Construct a fit result.
    #[inline]
    pub fn new(model: ScalarModel, score: f64) -> Self {
        // Assert the score is a non-negative number.
        assert!(!score.is_nan(), "Fit score must not be NaN.");
        assert!(score >= 0., "Fit score must be non-negative.");

        Self { model, score }
    }

    /// The fitted model.
    #[inline]
    pub fn model(&self) -> &ScalarModel {
        &self.model
    }

    /// The goodness-of-fit score; lower is better.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The model family tag.
    #[inline]
    pub fn model_type(&self) -> ModelType {
        self.model.model_type()
    }

    /// Consume the result, yielding the model.
    #[inline]
    pub fn into_model(self) -> ScalarModel {
        self.model
    }
}

/// A distribution fitter.
///
/// `estimate` produces a model from summary statistics and the sorted
/// sample; `fit` scores it with the Kolmogorov-Smirnov D-statistic plus a
/// distribution-specific adjustment. Estimation failures degrade to a wide
/// fallback model of the same family rather than erroring; an unusable
/// candidate (e.g. a support mismatch a family cannot represent at all) may
/// be reported through `fit` returning `None`.
pub trait DistributionFitter: DistributionFitterClone + Send + Sync + std::fmt::Debug {
    /// The model family this fitter produces.
    fn model_type(&self) -> ModelType;

    /// Estimate model parameters from statistics and the sorted sample.
    fn estimate(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> ScalarModel;

    /// Distribution-specific score adjustment; identity by default.
    #[inline]
    fn adjust_score(
        &self,
        score: f64,
        _statistics: &DimensionStatistics,
        _model: &ScalarModel,
    ) -> f64 {
        score
    }

    /// Fit and score the sorted sample.
    fn fit(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> Option<FitResult> {
        // Assert the sample is not empty.
        assert!(!sorted.is_empty(), "Cannot fit an empty sample.");

        // Estimate the model, score it, apply the adjustment.
        let model = self.estimate(statistics, sorted);
        let ks = ks_statistic(sorted, |x| model.cdf(x));
        let score = f64::max(self.adjust_score(ks, statistics, &model), 0.);

        Some(FitResult::new(model, score))
    }
}

/// Object-safe cloning for boxed [`DistributionFitter`] trait objects.
pub trait DistributionFitterClone {
    /// Clone `self` into a fresh boxed trait object.
    fn clone_box(&self) -> Box<dyn DistributionFitter>;
}

impl<T> DistributionFitterClone for T
where
    T: DistributionFitter + Clone + 'static,
{
    fn clone_box(&self) -> Box<dyn DistributionFitter> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn DistributionFitter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
