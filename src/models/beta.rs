use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta, ContinuousCDF};

/// Beta distribution model rescaled to the support `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetaModel {
    alpha: f64,
    beta: f64,
    lo: f64,
    hi: f64,
}

impl BetaModel {
    /// Construct a beta model.
    #[inline]
    pub fn new(alpha: f64, beta: f64, lo: f64, hi: f64) -> Self {
        // Assert the shapes are strictly positive.
        assert!(
            alpha > 0. && beta > 0.,
            "Shape parameters must be strictly positive."
        );
        // Assert the support is ordered.
        assert!(lo < hi, "Support bounds must be ordered.");

        Self { alpha, beta, lo, hi }
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

    /// Lower support bound.
    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper support bound.
    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// The standardized reference distribution.
    #[inline]
    fn standard(&self) -> Beta {
        Beta::new(self.alpha, self.beta).expect("Failed to construct beta distribution.")
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        let t = f64::clamp((x - self.lo) / (self.hi - self.lo), 0., 1.);

        self.standard().cdf(t)
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        let t = self.standard().inverse_cdf(u);

        self.lo + t * (self.hi - self.lo)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("lo", self.lo),
            ("hi", self.hi),
        ]
    }

    /// Characteristic location.
    #[inline]
    pub fn location(&self) -> f64 {
        self.lo + self.alpha / (self.alpha + self.beta) * (self.hi - self.lo)
    }
}
