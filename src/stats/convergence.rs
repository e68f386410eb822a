use log::trace;

use super::{DimensionStatistics, MomentAccumulator};

/// Indices of the tracked parameters.
const MEAN: usize = 0;
const VARIANCE: usize = 1;
const SKEWNESS: usize = 2;
const KURTOSIS: usize = 3;

/// Moment accumulator with convergence detection.
///
/// Every checkpoint interval the current moments are compared against the
/// values at the prior checkpoint. A parameter is declared converged when its
/// drift falls below a fraction of its asymptotic standard error:
///
/// ```text
///     |\Delta\theta| < \epsilon * SE(\theta)
/// ```
///
/// with SE(\mu) = \sigma / sqrt(n), SE(\sigma^2) = \sigma^2 sqrt(2 / n),
/// SE(\gamma_1) = sqrt(6 / n) and SE(\beta_2) = sqrt(24 / n). Convergence is
/// monotonic: once flagged, a parameter is never un-flagged.
#[derive(Clone, Debug)]
pub struct ConvergenceDetector {
    accumulator: MomentAccumulator,
    interval: usize,
    tolerance: f64,
    min_samples: usize,
    previous: Option<[f64; 4]>,
    converged: [bool; 4],
}

impl Default for ConvergenceDetector {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ConvergenceDetector {
    /// Construct a detector with checkpoint interval 1000, tolerance 0.05
    /// and a 5000-sample minimum.
    #[inline]
    pub fn new() -> Self {
        Self {
            accumulator: MomentAccumulator::new(),
            interval: 1_000,
            tolerance: 0.05,
            min_samples: 5_000,
            previous: None,
            converged: [false; 4],
        }
    }

    /// Set the checkpoint interval.
    #[inline]
    pub fn with_interval(mut self, interval: usize) -> Self {
        // Assert the interval is positive.
        assert!(interval > 0, "Checkpoint interval must be positive.");
        // Set checkpoint interval.
        self.interval = interval;

        self
    }

    /// Set the convergence tolerance $\epsilon$ .
    #[inline]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        // Assert the tolerance is positive.
        assert!(tolerance > 0., "Convergence tolerance must be positive.");
        // Set tolerance.
        self.tolerance = tolerance;

        self
    }

    /// Set the minimum number of samples before any convergence flag.
    #[inline]
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        // Set minimum samples.
        self.min_samples = min_samples;

        self
    }

    /// Accumulate a value, checkpointing on the interval boundary.
    pub fn add(&mut self, v: f64) {
        self.accumulator.add(v);

        if self.accumulator.n() % self.interval == 0 {
            self.checkpoint();
        }
    }

    /// Compare current moments against the prior checkpoint.
    fn checkpoint(&mut self) {
        let n = self.accumulator.n() as f64;
        let sigma2 = self.accumulator.variance();
        let sigma = f64::sqrt(sigma2);

        let current = [
            self.accumulator.mean(),
            sigma2,
            self.accumulator.skewness(),
            self.accumulator.kurtosis(),
        ];

        if let Some(previous) = self.previous {
            // Asymptotic standard errors of the four parameters.
            let se = [
                sigma / f64::sqrt(n),
                sigma2 * f64::sqrt(2. / n),
                f64::sqrt(6. / n),
                f64::sqrt(24. / n),
            ];

            // Latch parameters whose drift fell below tolerance.
            if self.accumulator.n() >= self.min_samples {
                for i in MEAN..=KURTOSIS {
                    let drift = f64::abs(current[i] - previous[i]);
                    // A degenerate stream has zero drift and zero error.
                    if drift < self.tolerance * se[i] || (drift == 0. && se[i] == 0.) {
                        self.converged[i] = true;
                    }
                }
            }

            trace!(
                "checkpoint at n: {}, converged: {:?}",
                self.accumulator.n(),
                self.converged
            );
        }

        self.previous = Some(current);
    }

    /// Whether all four parameters have converged.
    #[inline]
    pub fn converged(&self) -> bool {
        self.converged.iter().all(|&c| c)
    }

    /// Whether the mean has converged.
    #[inline]
    pub fn mean_converged(&self) -> bool {
        self.converged[MEAN]
    }

    /// Whether the variance has converged.
    #[inline]
    pub fn variance_converged(&self) -> bool {
        self.converged[VARIANCE]
    }

    /// Whether the skewness has converged.
    #[inline]
    pub fn skewness_converged(&self) -> bool {
        self.converged[SKEWNESS]
    }

    /// Whether the kurtosis has converged.
    #[inline]
    pub fn kurtosis_converged(&self) -> bool {
        self.converged[KURTOSIS]
    }

    /// The wrapped accumulator.
    #[inline]
    pub fn accumulator(&self) -> &MomentAccumulator {
        &self.accumulator
    }

    /// Freeze into a statistics record for dimension `index`.
    #[inline]
    pub fn statistics(&self, index: usize) -> DimensionStatistics {
        self.accumulator.statistics(index)
    }
}
