use log::debug;

use super::{DistributionFitter, FitResult};
use crate::{
    models::{CompositeModel, ModelType, NormalModel, ScalarModel},
    selection::{BestFitSelector, SelectionStrategy},
    stats::{empirical_cdf, DimensionStatistics, ModeDetection, ModeDetector, MomentAccumulator},
};

/// Number of grid points in the CDF sanity check.
const SANITY_POINTS: usize = 101;

/// Composite (mixture) distribution fitter.
///
/// Segments a multimodal sample by mode, fits a component to each segment
/// through a dedicated component selector (one configured without composite
/// or empirical fitters, so mixtures never nest), and assembles a weighted
/// mixture. The assembled CDF is sanity-checked against the empirical CDF
/// before the candidate is admitted; the score is the BIC-like quantity
///
/// ```text
///     (-2 \hat{L} + p ln n) / n,  \hat{L} = -n \sum_i s_i
/// ```
///
/// with p the total free parameter count of the mixture.
#[derive(Clone, Debug)]
pub struct CompositeFitter {
    detector: ModeDetector,
    components: BestFitSelector,
    min_mode_samples: usize,
    cdf_threshold: f64,
    em_iterations: Option<usize>,
}

impl CompositeFitter {
    /// Construct a composite fitter from a mode detector and a component
    /// selector.
    #[inline]
    pub fn new(detector: ModeDetector, components: BestFitSelector) -> Self {
        Self {
            detector,
            components,
            min_mode_samples: 50,
            cdf_threshold: 0.05,
            em_iterations: None,
        }
    }

    /// Set the minimum samples required per mode.
    #[inline]
    pub fn with_min_mode_samples(mut self, min_mode_samples: usize) -> Self {
        // Set minimum mode samples.
        self.min_mode_samples = min_mode_samples;

        self
    }

    /// Set the CDF sanity-check rejection threshold.
    #[inline]
    pub fn with_cdf_threshold(mut self, cdf_threshold: f64) -> Self {
        // Assert the threshold is positive.
        assert!(cdf_threshold > 0., "Sanity threshold must be positive.");
        // Set sanity threshold.
        self.cdf_threshold = cdf_threshold;

        self
    }

    /// Replace hard nearest-peak segmentation with soft EM assignment for a
    /// fixed number of iterations.
    #[inline]
    pub fn with_em(mut self, iterations: usize) -> Self {
        // Assert at least one iteration.
        assert!(iterations > 0, "EM requires at least one iteration.");
        // Set EM iterations.
        self.em_iterations = Some(iterations);

        self
    }

    /// Split the sorted sample at the midpoints between consecutive peaks.
    fn segment(sorted: &[f64], detection: &ModeDetection) -> Vec<Vec<f64>> {
        let mut segments = Vec::with_capacity(detection.peaks.len());
        let mut start = 0;
        for i in 0..detection.peaks.len() {
            let end = match i + 1 < detection.peaks.len() {
                true => {
                    let boundary = 0.5 * (detection.peaks[i] + detection.peaks[i + 1]);
                    sorted.partition_point(|&v| v < boundary)
                }
                false => sorted.len(),
            };
            segments.push(sorted[start..end].to_vec());
            start = end;
        }

        segments
    }

    /// Soft-assignment segmentation: Gaussian responsibilities refined for a
    /// fixed number of iterations, then hardened by maximum responsibility.
    fn segment_em(sorted: &[f64], detection: &ModeDetection, iterations: usize) -> Vec<Vec<f64>> {
        let k = detection.peaks.len();
        let n = sorted.len();
        let range = sorted[n - 1] - sorted[0];

        // Initialize from the detected modes.
        let mut means = detection.peaks.clone();
        let mut sigmas = vec![f64::max(range / (4. * k as f64), 1e-9); k];
        let mut weights = detection.weights.clone();

        let mut responsibilities = vec![vec![0.; k]; n];
        for _ in 0..iterations {
            // E-step: Gaussian responsibilities.
            for (i, &x) in sorted.iter().enumerate() {
                let mut total = 0.;
                for j in 0..k {
                    let z = (x - means[j]) / sigmas[j];
                    let density = weights[j] * f64::exp(-0.5 * z * z) / sigmas[j];
                    responsibilities[i][j] = density;
                    total += density;
                }
                // Orphaned samples stay with their nearest mode.
                if total > 0. {
                    for j in 0..k {
                        responsibilities[i][j] /= total;
                    }
                }
            }

            // M-step: re-estimate weights, means and scales.
            for j in 0..k {
                let mass: f64 = responsibilities.iter().map(|r| r[j]).sum();
                if mass <= 0. {
                    continue;
                }
                weights[j] = mass / n as f64;
                means[j] = sorted
                    .iter()
                    .zip(&responsibilities)
                    .map(|(&x, r)| r[j] * x)
                    .sum::<f64>()
                    / mass;
                let variance = sorted
                    .iter()
                    .zip(&responsibilities)
                    .map(|(&x, r)| r[j] * (x - means[j]) * (x - means[j]))
                    .sum::<f64>()
                    / mass;
                sigmas[j] = f64::max(f64::sqrt(variance), 1e-9);
            }
        }

        // Harden by maximum responsibility.
        let mut segments = vec![Vec::new(); k];
        for (i, &x) in sorted.iter().enumerate() {
            let best = (0..k)
                .max_by(|&a, &b| responsibilities[i][a].total_cmp(&responsibilities[i][b]))
                .unwrap_or(0);
            segments[best].push(x);
        }

        segments
    }
}

impl DistributionFitter for CompositeFitter {
    #[inline]
    fn model_type(&self) -> ModelType {
        ModelType::Composite
    }

    fn estimate(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> ScalarModel {
        // Degrade to a single-component mixture when fitting fails.
        match self.fit(statistics, sorted) {
            Some(result) => result.into_model(),
            None => {
                let std_dev = match statistics.std_dev() > 0. {
                    true => statistics.std_dev(),
                    false => f64::max(statistics.range(), 1.),
                };
                let component = NormalModel::new(statistics.mean(), std_dev);

                CompositeModel::new(vec![(1., component.into())]).into()
            }
        }
    }

    fn fit(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> Option<FitResult> {
        // Assert the sample is not empty.
        assert!(!sorted.is_empty(), "Cannot fit an empty sample.");

        let n = sorted.len();

        // Preconditions: a multimodal sample with at least two modes.
        let detection = self.detector.detect_adaptive(sorted);
        if !detection.multimodal || detection.modes < 2 {
            return None;
        }

        // Segment by mode.
        let segments = match self.em_iterations {
            Some(iterations) => Self::segment_em(sorted, &detection, iterations),
            None => Self::segment(sorted, &detection),
        };

        // Every mode must carry enough samples to fit.
        if segments.iter().any(|s| s.len() < self.min_mode_samples) {
            debug!("composite rejected: a mode holds fewer than {} samples", self.min_mode_samples);
            return None;
        }

        // Fit a component to each segment.
        let mut components = Vec::with_capacity(segments.len());
        let mut component_scores = 0.;
        for segment in &segments {
            let mut accumulator = MomentAccumulator::new();
            accumulator.extend(segment);
            let segment_statistics = accumulator.statistics(statistics.index());

            let result = self.components.select(&segment_statistics, segment);
            component_scores += result.score();
            components.push((segment.len() as f64 / n as f64, result.into_model()));
        }

        let model = CompositeModel::new(components);

        // Sanity check the assembled CDF against the empirical CDF.
        let mut max_deviation = 0.;
        let mut mean_deviation = 0.;
        for i in 0..SANITY_POINTS {
            let x = statistics.min()
                + statistics.range() * i as f64 / (SANITY_POINTS - 1) as f64;
            let deviation = f64::abs(model.cdf(x) - empirical_cdf(sorted, x));
            max_deviation = f64::max(max_deviation, deviation);
            mean_deviation += deviation / SANITY_POINTS as f64;
        }
        debug!(
            "composite CDF deviation: max {}, mean {}",
            max_deviation, mean_deviation
        );
        if max_deviation > self.cdf_threshold {
            debug!("composite rejected: deviation exceeds {}", self.cdf_threshold);
            return None;
        }

        // BIC-like score with the log-likelihood approximated from the
        // component scores.
        let p = model.parameter_count() as f64;
        let score = 2. * component_scores + p * f64::ln(n as f64) / n as f64;

        Some(FitResult::new(model.into(), score))
    }
}
