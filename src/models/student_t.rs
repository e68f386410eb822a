use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Student's t distribution model with location and scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentTModel {
    degrees_of_freedom: f64,
    location: f64,
    scale: f64,
}

impl StudentTModel {
    /// Construct a Student's t model.
    #[inline]
    pub fn new(degrees_of_freedom: f64, location: f64, scale: f64) -> Self {
        // Assert the degrees of freedom and scale are strictly positive.
        assert!(
            degrees_of_freedom > 0. && scale > 0.,
            "Degrees of freedom and scale must be strictly positive."
        );

        Self {
            degrees_of_freedom,
            location,
            scale,
        }
    }

    /// Degrees of freedom $\nu$ .
    #[inline]
    pub fn degrees_of_freedom(&self) -> f64 {
        self.degrees_of_freedom
    }

    /// Location parameter.
    #[inline]
    pub fn center(&self) -> f64 {
        self.location
    }

    /// Scale parameter.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The reference distribution.
    #[inline]
    fn standard(&self) -> StudentsT {
        StudentsT::new(self.location, self.scale, self.degrees_of_freedom)
            .expect("Failed to construct Student's t distribution.")
    }

    /// Cumulative distribution function at x.
    #[inline]
    pub fn cdf(&self, x: f64) -> f64 {
        self.standard().cdf(x)
    }

    /// Quantile function at u in (0, 1).
    #[inline]
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        self.standard().inverse_cdf(u)
    }

    /// Named parameters.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("degrees_of_freedom", self.degrees_of_freedom),
            ("location", self.location),
            ("scale", self.scale),
        ]
    }

    /// Characteristic location.
    #[inline]
    pub fn location(&self) -> f64 {
        self.location
    }
}
