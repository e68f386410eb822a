use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

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

mod vector_space;
pub use vector_space::*;

/// Model family tag.
///
/// The string form of each tag is a serialization compatibility contract.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Normal distribution, optionally truncated.
    Normal,
    /// Uniform distribution.
    Uniform,
    /// Beta distribution on a bounded support.
    Beta,
    /// Gamma distribution with location shift.
    Gamma,
    /// Student's t distribution.
    StudentT,
    /// Inverse-Gamma distribution.
    InverseGamma,
    /// Beta-Prime distribution.
    BetaPrime,
    /// Pearson type IV distribution.
    PearsonIv,
    /// Weighted mixture of scalar models.
    Composite,
    /// Histogram-backed empirical distribution.
    Empirical,
}

impl ModelType {
    /// Stable string tag of the model family.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Uniform => "uniform",
            Self::Beta => "beta",
            Self::Gamma => "gamma",
            Self::StudentT => "student_t",
            Self::InverseGamma => "inverse_gamma",
            Self::BetaPrime => "beta_prime",
            Self::PearsonIv => "pearson_iv",
            Self::Composite => "composite",
            Self::Empirical => "empirical",
        }
    }

    /// Complexity rank used by the selector's simplicity bias; lower is
    /// simpler.
    pub fn complexity(&self) -> usize {
        match self {
            Self::Normal => 1,
            Self::Uniform => 2,
            Self::Beta => 3,
            Self::Gamma => 4,
            Self::StudentT => 5,
            Self::InverseGamma => 6,
            Self::BetaPrime => 7,
            Self::PearsonIv => 8,
            Self::Composite => 9,
            Self::Empirical => 10,
        }
    }

    /// Whether this is the empirical fallback family.
    #[inline]
    pub fn is_empirical(&self) -> bool {
        matches!(self, Self::Empirical)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scalar marginal distribution model.
///
/// Tagged variant over the supported model families. Every variant exposes
/// `cdf`, `inverse_cdf` and a stable [`ModelType`] tag; no downstream
/// behavior depends on the representation beyond these three.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum ScalarModel {
    /// Normal distribution, optionally truncated.
    Normal(NormalModel),
    /// Uniform distribution.
    Uniform(UniformModel),
    /// Beta distribution on a bounded support.
    Beta(BetaModel),
    /// Gamma distribution with location shift.
    Gamma(GammaModel),
    /// Student's t distribution.
    StudentT(StudentTModel),
    /// Inverse-Gamma distribution.
    InverseGamma(InverseGammaModel),
    /// Beta-Prime distribution.
    BetaPrime(BetaPrimeModel),
    /// Pearson type IV distribution.
    PearsonIv(PearsonIvModel),
    /// Weighted mixture of scalar models.
    Composite(CompositeModel),
    /// Histogram-backed empirical distribution.
    Empirical(EmpiricalModel),
}

impl ScalarModel {
    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Normal(m) => m.cdf(x),
            Self::Uniform(m) => m.cdf(x),
            Self::Beta(m) => m.cdf(x),
            Self::Gamma(m) => m.cdf(x),
            Self::StudentT(m) => m.cdf(x),
            Self::InverseGamma(m) => m.cdf(x),
            Self::BetaPrime(m) => m.cdf(x),
            Self::PearsonIv(m) => m.cdf(x),
            Self::Composite(m) => m.cdf(x),
            Self::Empirical(m) => m.cdf(x),
        }
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        // Assert u in (0, 1).
        assert!(
            0. < u && u < 1.,
            "Quantiles are defined on the open unit interval."
        );

        match self {
            Self::Normal(m) => m.inverse_cdf(u),
            Self::Uniform(m) => m.inverse_cdf(u),
            Self::Beta(m) => m.inverse_cdf(u),
            Self::Gamma(m) => m.inverse_cdf(u),
            Self::StudentT(m) => m.inverse_cdf(u),
            Self::InverseGamma(m) => m.inverse_cdf(u),
            Self::BetaPrime(m) => m.inverse_cdf(u),
            Self::PearsonIv(m) => m.inverse_cdf(u),
            Self::Composite(m) => m.inverse_cdf(u),
            Self::Empirical(m) => m.inverse_cdf(u),
        }
    }

    /// Model family tag.
    pub fn model_type(&self) -> ModelType {
        match self {
            Self::Normal(_) => ModelType::Normal,
            Self::Uniform(_) => ModelType::Uniform,
            Self::Beta(_) => ModelType::Beta,
            Self::Gamma(_) => ModelType::Gamma,
            Self::StudentT(_) => ModelType::StudentT,
            Self::InverseGamma(_) => ModelType::InverseGamma,
            Self::BetaPrime(_) => ModelType::BetaPrime,
            Self::PearsonIv(_) => ModelType::PearsonIv,
            Self::Composite(_) => ModelType::Composite,
            Self::Empirical(_) => ModelType::Empirical,
        }
    }

    /// Flat named-parameter view, used for drift measurement and diagnostics.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::Normal(m) => m.parameters(),
            Self::Uniform(m) => m.parameters(),
            Self::Beta(m) => m.parameters(),
            Self::Gamma(m) => m.parameters(),
            Self::StudentT(m) => m.parameters(),
            Self::InverseGamma(m) => m.parameters(),
            Self::BetaPrime(m) => m.parameters(),
            Self::PearsonIv(m) => m.parameters(),
            Self::Composite(m) => m.parameters(),
            Self::Empirical(m) => m.parameters(),
        }
    }

    /// Number of free parameters, as counted by mixture scoring.
    pub fn parameter_count(&self) -> usize {
        match self {
            Self::Composite(m) => m.parameter_count(),
            Self::Empirical(m) => m.parameter_count(),
            _ => self.parameters().len(),
        }
    }

    /// Characteristic location, used for canonical component ordering.
    pub fn location(&self) -> f64 {
        match self {
            Self::Normal(m) => m.location(),
            Self::Uniform(m) => m.location(),
            Self::Beta(m) => m.location(),
            Self::Gamma(m) => m.location(),
            Self::StudentT(m) => m.location(),
            Self::InverseGamma(m) => m.location(),
            Self::BetaPrime(m) => m.location(),
            Self::PearsonIv(m) => m.location(),
            Self::Composite(m) => m.location(),
            Self::Empirical(m) => m.location(),
        }
    }

    /// Draw n deterministic inverse-CDF samples.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64> {
        (0..n)
            .map(|_| {
                // Clamp away from the endpoints of the unit interval.
                let u = f64::clamp(rng.gen::<f64>(), 1e-12, 1. - 1e-12);

                self.inverse_cdf(u)
            })
            .collect()
    }
}

macro_rules! impl_from_model {
    ($variant:ident, $model:ident) => {
        impl From<$model> for ScalarModel {
            #[inline]
            fn from(m: $model) -> Self {
                Self::$variant(m)
            }
        }
    };
}

impl_from_model!(Normal, NormalModel);
impl_from_model!(Uniform, UniformModel);
impl_from_model!(Beta, BetaModel);
impl_from_model!(Gamma, GammaModel);
impl_from_model!(StudentT, StudentTModel);
impl_from_model!(InverseGamma, InverseGammaModel);
impl_from_model!(BetaPrime, BetaPrimeModel);
impl_from_model!(PearsonIv, PearsonIvModel);
impl_from_model!(Composite, CompositeModel);
impl_from_model!(Empirical, EmpiricalModel);
