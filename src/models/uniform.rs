use serde::{Deserialize, Serialize};

/// Uniform distribution model on `[lo, hi]`.
///
/// The degenerate case `lo == hi` models a constant column: the CDF is a
/// step at the single support point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformModel {
    lo: f64,
    hi: f64,
}

impl UniformModel {
    /// Construct a uniform model.
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        // Assert the support is ordered.
        assert!(lo <= hi, "Support bounds must be ordered.");

        Self { lo, hi }
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

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        // Degenerate support steps at the single point.
        if self.hi <= self.lo {
            return match x >= self.lo {
                true => 1.,
                false => 0.,
            };
        }

        f64::clamp((x - self.lo) / (self.hi - self.lo), 0., 1.)
    }

    /// Quantile function at u in (0, 1).
    #[inline]
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        self.lo + u * (self.hi - self.lo)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![("lo", self.lo), ("hi", self.hi)]
    }

    /// Characteristic location.
    #[inline]
    pub fn location(&self) -> f64 {
        0.5 * (self.lo + self.hi)
    }
}
