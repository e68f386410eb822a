use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, InverseGamma};

/// Inverse-Gamma distribution model on `(0, +inf)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InverseGammaModel {
    alpha: f64,
    beta: f64,
}

impl InverseGammaModel {
    /// Construct an inverse-gamma model.
    #[inline]
    pub fn new(alpha: f64, beta: f64) -> Self {
        // Assert shape and rate are strictly positive.
        assert!(
            alpha > 0. && beta > 0.,
            "Shape and rate must be strictly positive."
        );

        Self { alpha, beta }
    }

    /// Shape parameter $\alpha$ .
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Rate parameter $\beta$ .
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// The reference distribution.
    #[inline]
    fn standard(&self) -> InverseGamma {
        InverseGamma::new(self.alpha, self.beta)
            .expect("Failed to construct inverse-gamma distribution.")
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0. {
            return 0.;
        }

        self.standard().cdf(x)
    }

    /// Quantile function at u in (0, 1).
    #[inline]
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        self.standard().inverse_cdf(u)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("alpha", self.alpha), ("beta", self.beta)]
    }

    /// Characteristic location: the mean when it exists, the mode otherwise.
    #[inline]
    pub fn location(&self) -> f64 {
        match self.alpha > 1. {
            true => self.beta / (self.alpha - 1.),
            false => self.beta / (self.alpha + 1.),
        }
    }
}
