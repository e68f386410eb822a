use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Gamma};

/// Gamma distribution model with a location shift.
///
/// Shape-scale parameterization; the support is `[location, +inf)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GammaModel {
    shape: f64,
    scale: f64,
    location: f64,
}

impl GammaModel {
    /// Construct a gamma model.
    #[inline]
    pub fn new(shape: f64, scale: f64, location: f64) -> Self {
        // Assert shape and scale are strictly positive.
        assert!(
            shape > 0. && scale > 0.,
            "Shape and scale must be strictly positive."
        );

        Self {
            shape,
            scale,
            location,
        }
    }

    /// Shape parameter k.
    #[inline]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    /// Scale parameter $\theta$ .
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Location shift.
    #[inline]
    pub fn shift(&self) -> f64 {
        self.location
    }

    /// The unshifted reference distribution.
    #[inline]
    fn standard(&self) -> Gamma {
        Gamma::new(self.shape, 1. / self.scale).expect("Failed to construct gamma distribution.")
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.location {
            return 0.;
        }

        self.standard().cdf(x - self.location)
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        self.location + self.standard().inverse_cdf(u)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("shape", self.shape),
            ("scale", self.scale),
            ("location", self.location),
        ]
    }

    /// Characteristic location: the distribution mean.
    #[inline]
    pub fn location(&self) -> f64 {
        self.location + self.shape * self.scale
    }
}
