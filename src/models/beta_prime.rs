use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, ContinuousCDF};

use crate::functions::regularized_beta;

/// Beta-Prime distribution model on `(0, +inf)`.
///
/// The CDF reduces to the regularized incomplete Beta function through the
/// substitution t = x / (1 + x):
///
/// ```text
///     F(x) = I_{x / (1 + x)}(\alpha, \beta)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetaPrimeModel {
    alpha: f64,
    beta: f64,
}

impl BetaPrimeModel {
    /// Construct a beta-prime model.
    #[inline]
    pub fn new(alpha: f64, beta: f64) -> Self {
        // Assert the first shape is strictly positive.
        assert!(alpha > 0., "Shape parameter must be strictly positive.");
        // Assert the second shape yields a finite variance.
        assert!(beta > 2., "Second shape must exceed two for finite variance.");

        Self { alpha, beta }
    }

    /// First shape parameter $\alpha$ .
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Second shape parameter $\beta$ .
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0. {
            return 0.;
        }

        regularized_beta(self.alpha, self.beta, x / (1. + x))
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        // Invert through the beta quantile of the substituted variable.
        let t = Beta::new(self.alpha, self.beta)
            .expect("Failed to construct beta distribution.")
            .inverse_cdf(u);
        let t = f64::min(t, 1. - 1e-15);

        t / (1. - t)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("alpha", self.alpha), ("beta", self.beta)]
    }

    /// Characteristic location: the distribution mean.
    #[inline]
    pub fn location(&self) -> f64 {
        self.alpha / (self.beta - 1.)
    }
}
