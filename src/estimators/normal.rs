use super::DistributionFitter;
use crate::{
    functions::std_normal_cdf,
    models::{ModelType, NormalModel, ScalarModel},
    stats::DimensionStatistics,
};

/// Normal distribution fitter.
///
/// Moment-based estimation. The truncated form is emitted when the sample
/// piles up against both extremes (a fraction of at least 2% of the samples
/// within `tau * range` of each) or when the observed range is narrower than
/// three standard deviations.
#[derive(Clone, Debug)]
pub struct NormalFitter {
    tau: f64,
    bounds: Option<(f64, f64)>,
}

impl Default for NormalFitter {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl NormalFitter {
    /// Construct a normal fitter with edge fraction `tau = 0.01`.
    #[inline]
    pub fn new() -> Self {
        Self {
            tau: 0.01,
            bounds: None,
        }
    }

    /// Set the edge-detection fraction.
    #[inline]
    pub fn with_tau(mut self, tau: f64) -> Self {
        // Assert the fraction is positive.
        assert!(tau > 0., "Edge fraction must be positive.");
        // Set edge fraction.
        self.tau = tau;

        self
    }

    /// Force truncation to fixed bounds, for known-bounded data.
    #[inline]
    pub fn with_bounds(mut self, lo: f64, hi: f64) -> Self {
        // Assert the bounds are ordered.
        assert!(lo < hi, "Truncation bounds must be ordered.");
        // Set forced bounds.
        self.bounds = Some((lo, hi));

        self
    }

    /// Variance of a truncated normal with the given parent parameters.
    fn truncated_variance(mean: f64, sigma: f64, lo: f64, hi: f64) -> f64 {
        let density = |t: f64| f64::exp(-0.5 * t * t) / f64::sqrt(std::f64::consts::TAU);

        let a = (lo - mean) / sigma;
        let b = (hi - mean) / sigma;
        let z = std_normal_cdf(b) - std_normal_cdf(a);
        if z <= 1e-12 {
            return sigma * sigma;
        }

        let shift = (density(a) - density(b)) / z;

        sigma * sigma * (1. + (a * density(a) - b * density(b)) / z - shift * shift)
    }

    /// Parent standard deviation whose truncation to `[lo, hi]` reproduces
    /// the observed variance, found by bisection.
    ///
    /// Truncation shrinks variance, so the sample standard deviation brackets
    /// the parent from below; the observed variance saturates toward the
    /// flat limit as the parent scale grows.
    fn truncated_std_dev(mean: f64, variance: f64, lo: f64, hi: f64) -> f64 {
        let sample = f64::sqrt(variance);
        let (mut lo_s, mut hi_s) = (0.5 * sample, 50. * sample);

        // The observed variance may sit beyond the reachable limit.
        if Self::truncated_variance(mean, hi_s, lo, hi) < variance {
            return hi_s;
        }

        for _ in 0..100 {
            let mid = 0.5 * (lo_s + hi_s);
            match Self::truncated_variance(mean, mid, lo, hi) < variance {
                true => lo_s = mid,
                false => hi_s = mid,
            }
            if hi_s - lo_s <= 1e-12 * hi_s {
                break;
            }
        }

        0.5 * (lo_s + hi_s)
    }

    /// Build the truncated form, recovering the parent scale from the
    /// observed variance.
    fn truncated(statistics: &DimensionStatistics, lo: f64, hi: f64) -> NormalModel {
        let std_dev = match statistics.variance() > 0. {
            true => Self::truncated_std_dev(statistics.mean(), statistics.variance(), lo, hi),
            false => f64::max(hi - lo, 1.),
        };

        NormalModel::new(statistics.mean(), std_dev).with_bounds(lo, hi)
    }

    /// Whether the sample piles up against both extremes.
    fn edge_heavy(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> bool {
        let n = sorted.len();
        if n < 100 {
            return false;
        }

        let edge = self.tau * statistics.range();
        let near_min = sorted.partition_point(|&v| v <= statistics.min() + edge);
        let near_max = n - sorted.partition_point(|&v| v < statistics.max() - edge);

        near_min as f64 >= 0.02 * n as f64 && near_max as f64 >= 0.02 * n as f64
    }
}

impl DistributionFitter for NormalFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Normal
    }

    fn estimate(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> ScalarModel {
        // Degenerate variance falls back to a wide scale.
        let std_dev = match statistics.std_dev() > 0. {
            true => statistics.std_dev(),
            false => f64::max(statistics.range(), 1.),
        };

        // Forced bounds take precedence over detection.
        if let Some((lo, hi)) = self.bounds {
            return Self::truncated(statistics, lo, hi).into();
        }

        // Truncate when the sample is edge-heavy or the range is narrow.
        let narrow = statistics.range() < 3. * std_dev;
        if statistics.range() > 0. && (self.edge_heavy(statistics, sorted) || narrow) {
            return Self::truncated(statistics, statistics.min(), statistics.max()).into();
        }

        NormalModel::new(statistics.mean(), std_dev).into()
    }
}
