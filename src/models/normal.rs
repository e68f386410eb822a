use serde::{Deserialize, Serialize};

use crate::functions::{std_normal_cdf, std_normal_quantile};

/// Normal distribution model, optionally truncated to `[lo, hi]`.
///
/// The truncated form renormalizes the CDF over the bounded support:
///
/// ```text
///     F(x) = (\Phi(z) - \Phi(z_lo)) / (\Phi(z_hi) - \Phi(z_lo))
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalModel {
    mean: f64,
    std_dev: f64,
    bounds: Option<(f64, f64)>,
}

impl NormalModel {
    /// Construct an unbounded normal model.
    #[inline]
    pub fn new(mean: f64, std_dev: f64) -> Self {
        // Assert the scale is strictly positive.
        assert!(
            std_dev.is_finite() && std_dev > 0.,
            "Standard deviation must be strictly positive."
        );

        Self {
            mean,
            std_dev,
            bounds: None,
        }
    }

    /// Truncate the model to `[lo, hi]`.
    #[inline]
    pub fn with_bounds(mut self, lo: f64, hi: f64) -> Self {
        // Assert the bounds are ordered.
        assert!(lo < hi, "Truncation bounds must be ordered.");
        // Set truncation bounds.
        self.bounds = Some((lo, hi));

        self
    }

    /// Mean $\mu$ .
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation $\sigma$ .
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Truncation bounds, if any.
    #[inline]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.bounds
    }

    /// Standardize x.
    #[inline]
    fn z(&self, x: f64) -> f64 {
        (x - self.mean) / self.std_dev
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        match self.bounds {
            None => std_normal_cdf(self.z(x)),
            Some((lo, hi)) => {
                if x <= lo {
                    return 0.;
                }
                if x >= hi {
                    return 1.;
                }

                // Renormalize over the truncated support.
                let phi_lo = std_normal_cdf(self.z(lo));
                let phi_hi = std_normal_cdf(self.z(hi));

                (std_normal_cdf(self.z(x)) - phi_lo) / (phi_hi - phi_lo)
            }
        }
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        match self.bounds {
            None => self.mean + self.std_dev * std_normal_quantile(u),
            Some((lo, hi)) => {
                // Map u into the truncated probability range.
                let phi_lo = std_normal_cdf(self.z(lo));
                let phi_hi = std_normal_cdf(self.z(hi));
                let p = f64::clamp(phi_lo + u * (phi_hi - phi_lo), 1e-16, 1. - 1e-16);

                f64::clamp(self.mean + self.std_dev * std_normal_quantile(p), lo, hi)
            }
        }
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        let mut parameters = vec![("mean", self.mean), ("std_dev", self.std_dev)];
        if let Some((lo, hi)) = self.bounds {
            parameters.push(("lo", lo));
            parameters.push(("hi", hi));
        }

        parameters
    }

    /// Characteristic location.
    #[inline]
    pub fn location(&self) -> f64 {
        self.mean
    }
}
