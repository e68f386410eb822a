use itertools::Itertools;
use log::{debug, trace};

/// Upper bound on the histogram resolution.
const MAX_BINS: usize = 1_000;

/// Dip level above which gap evidence alone may declare multimodality.
const GAP_DIP: f64 = 0.03;

/// Result of a mode detection pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeDetection {
    /// Number of detected modes.
    pub modes: usize,
    /// Mode center locations, ascending.
    pub peaks: Vec<f64>,
    /// Peak heights, normalized to the tallest.
    pub heights: Vec<f64>,
    /// Mode weights, summing to one.
    pub weights: Vec<f64>,
    /// Dip statistic of the sample.
    pub dip: f64,
    /// Whether the sample is declared multimodal.
    pub multimodal: bool,
}

impl ModeDetection {
    /// A single-mode detection centered on `location`.
    fn unimodal(location: f64, dip: f64) -> Self {
        Self {
            modes: 1,
            peaks: vec![location],
            heights: vec![1.],
            weights: vec![1.],
            dip,
            multimodal: false,
        }
    }
}

/// Histogram gap evidence of multimodality.
///
/// Gaps survive where kernel smoothing would hide them, so they count as
/// structural evidence on their own.
#[derive(Clone, Copy, Debug, Default)]
struct GapEvidence {
    /// Number of contiguous regions of two or more near-empty bins.
    regions: usize,
    /// Number of sparse-bin valleys.
    valleys: usize,
}

impl GapEvidence {
    #[inline]
    fn present(&self) -> bool {
        self.regions > 0 || self.valleys > 0
    }
}

/// Adaptive-resolution histogram mode detector.
///
/// Combines a dip statistic, gap analysis on the raw histogram, kernel
/// smoothing and peak/valley filtering to count modes and weigh them. The
/// detected mode count is invariant under permutation of the input sample.
#[derive(Clone, Debug)]
pub struct ModeDetector {
    k_max: usize,
    dip_threshold: f64,
}

impl Default for ModeDetector {
    #[inline]
    fn default() -> Self {
        Self::new(3)
    }
}

impl ModeDetector {
    /// Construct a detector with an upper bound `k_max` on the mode count.
    #[inline]
    pub fn new(k_max: usize) -> Self {
        // Assert the mode bound is positive.
        assert!(k_max > 0, "Mode count bound must be positive.");

        Self {
            k_max,
            dip_threshold: 0.05,
        }
    }

    /// Set the dip threshold.
    #[inline]
    pub fn with_dip_threshold(mut self, dip_threshold: f64) -> Self {
        // Set dip threshold.
        self.dip_threshold = dip_threshold;

        self
    }

    /// Upper bound on the mode count.
    #[inline]
    pub fn k_max(&self) -> usize {
        self.k_max
    }

    /// Detect modes in `values` at the base histogram resolution.
    pub fn detect(&self, values: &[f64]) -> ModeDetection {
        // Assert the sample is not empty.
        assert!(!values.is_empty(), "Mode detection requires a non-empty sample.");

        // Sort a copy, so detection is permutation-invariant.
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let dip = dip_statistic(&sorted);

        // A degenerate range has exactly one mode.
        if sorted[sorted.len() - 1] <= sorted[0] {
            return ModeDetection::unimodal(sorted[0], dip);
        }

        let bins = self.bin_count(&sorted);
        self.detect_with_bins(&sorted, dip, bins)
    }

    /// Detect modes with adaptive-resolution refinement.
    ///
    /// When the base result looks under-resolved (few peaks at moderate dip,
    /// or many bins per detected mode), the histogram resolution is grown by
    /// half until the mode count is stable across two successive refinements.
    pub fn detect_adaptive(&self, values: &[f64]) -> ModeDetection {
        // Assert the sample is not empty.
        assert!(!values.is_empty(), "Mode detection requires a non-empty sample.");

        // Sort a copy, so detection is permutation-invariant.
        let mut sorted = values.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let dip = dip_statistic(&sorted);

        // A degenerate range has exactly one mode.
        if sorted[sorted.len() - 1] <= sorted[0] {
            return ModeDetection::unimodal(sorted[0], dip);
        }

        let mut bins = self.bin_count(&sorted);
        let mut detection = self.detect_with_bins(&sorted, dip, bins);

        // Refine while the result looks under-resolved.
        let mut previous = detection.modes;
        while bins < MAX_BINS {
            let under_resolved = (detection.modes < 2 && dip > GAP_DIP)
                || bins / usize::max(detection.modes, 1) > 40;
            if !under_resolved {
                break;
            }

            bins = usize::min(bins * 3 / 2, MAX_BINS);
            let refined = self.detect_with_bins(&sorted, dip, bins);
            trace!("refined bins: {}, modes: {}", bins, refined.modes);

            // Accept the first mode count stable across two refinements.
            if refined.modes == previous {
                return refined;
            }

            previous = refined.modes;
            detection = refined;
        }

        detection
    }

    /// Histogram bin count: max of Scott and Freedman-Diaconis rules,
    /// floored at `k_max * 5` bins.
    fn bin_count(&self, sorted: &[f64]) -> usize {
        let n = sorted.len() as f64;
        let range = sorted[sorted.len() - 1] - sorted[0];

        // Standard deviation for the Scott rule.
        let mean = sorted.iter().sum::<f64>() / n;
        let sigma = f64::sqrt(sorted.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n);

        // Interquartile range for the Freedman-Diaconis rule.
        let iqr = sorted[(sorted.len() * 3) / 4] - sorted[sorted.len() / 4];

        let scott = match sigma > 0. {
            true => f64::ceil(range / (3.49 * sigma * n.powf(-1. / 3.))) as usize,
            false => 0,
        };
        let fd = match iqr > 0. {
            true => f64::ceil(range / (2. * iqr * n.powf(-1. / 3.))) as usize,
            false => 0,
        };

        usize::max(scott, fd).clamp(self.k_max * 5, MAX_BINS)
    }

    /// Run the full detection pipeline at a fixed resolution.
    fn detect_with_bins(&self, sorted: &[f64], dip: f64, bins: usize) -> ModeDetection {
        let n = sorted.len();
        let min = sorted[0];
        let max = sorted[n - 1];
        let range = max - min;
        let width = range / bins as f64;

        // Build the raw histogram.
        let histogram = histogram(sorted, min, range, bins);

        // Gap analysis on the raw histogram.
        let expected = n as f64 / bins as f64;
        let gaps: Vec<bool> = histogram.iter().map(|&c| (c as f64) < 0.1 * expected).collect();
        let evidence = gap_evidence(&histogram, &gaps, expected);

        // Smooth with a Gaussian kernel, narrowing with k_max and gaps.
        let mut bandwidth = bins as f64 / (self.k_max as f64 * 6.);
        if evidence.present() {
            bandwidth *= 0.5;
        }
        let bandwidth = f64::max(bandwidth, 0.3);
        let smoothed = smooth(&histogram, bandwidth);

        // Find and filter peaks.
        let prominence = (0.3 / self.k_max as f64).clamp(0.03, 0.1);
        let mut peaks = find_peaks(&smoothed, prominence);
        let min_separation = usize::max(bins / (self.k_max * 3), 1);
        merge_close_peaks(&mut peaks, &smoothed, min_separation);
        let valley_fraction = match self.k_max <= 4 {
            true => 0.90,
            false => 0.92,
        };
        filter_valleys(&mut peaks, &smoothed, valley_fraction);

        // Fall back to gap regions when smoothing flattened everything out.
        if peaks.len() < 2 && evidence.present() && dip > GAP_DIP {
            let centers = non_gap_centers(&gaps);
            if centers.len() > peaks.len() {
                peaks = centers;
            }
        }

        // Enforce the mode bound, keeping the tallest peaks.
        if peaks.len() > self.k_max {
            peaks.sort_by(|&a, &b| smoothed[b].total_cmp(&smoothed[a]));
            peaks.truncate(self.k_max);
            peaks.sort_unstable();
        }

        debug!(
            "bins: {}, gap regions: {}, valleys: {}, peaks: {}",
            bins,
            evidence.regions,
            evidence.valleys,
            peaks.len()
        );

        if peaks.is_empty() {
            // The dip-only branch of the multimodality rule still applies
            // when no peak was resolved.
            let mut detection = ModeDetection::unimodal(sorted[n / 2], dip);
            detection.multimodal = dip > self.dip_threshold;

            return detection;
        }

        // Map peak bins to value-space locations.
        let locations: Vec<f64> = peaks.iter().map(|&p| min + (p as f64 + 0.5) * width).collect();

        // Normalize peak heights to the tallest.
        let tallest = peaks.iter().map(|&p| smoothed[p]).fold(0., f64::max);
        let heights: Vec<f64> = peaks.iter().map(|&p| smoothed[p] / tallest).collect();

        // Assign each sample to its nearest peak to compute mode weights.
        let weights = mode_weights(sorted, &locations);

        // Multimodality decision: a high dip alone flags the sample, even
        // when only one peak was resolved; otherwise two peaks with gap
        // evidence and a moderate dip are required.
        let second = heights.iter().cloned().sorted_by(f64::total_cmp).rev().nth(1);
        let ratio = f64::max(0.1, 0.5 / self.k_max as f64);
        let multimodal = dip > self.dip_threshold
            || (locations.len() >= 2
                && second.unwrap_or(0.) >= ratio
                && evidence.present()
                && dip > GAP_DIP);

        ModeDetection {
            modes: locations.len(),
            peaks: locations,
            heights,
            weights,
            dip,
            multimodal,
        }
    }
}

/// Dip statistic: supremum distance between the empirical CDF and the ideal
/// uniform CDF over the observed range. Coarse multimodality signal.
fn dip_statistic(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let min = sorted[0];
    let range = sorted[n - 1] - min;

    if range <= 0. {
        return 0.;
    }

    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let empirical = (i + 1) as f64 / n as f64;
            let uniform = (x - min) / range;

            f64::abs(empirical - uniform)
        })
        .fold(0., f64::max)
}

/// Equal-width histogram of a sorted sample.
fn histogram(sorted: &[f64], min: f64, range: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    for &v in sorted {
        let bin = usize::min((((v - min) / range) * bins as f64) as usize, bins - 1);
        counts[bin] += 1;
    }

    counts
}

/// Count contiguous gap regions and sparse-bin valleys.
fn gap_evidence(histogram: &[usize], gaps: &[bool], expected: f64) -> GapEvidence {
    // Count contiguous runs of two or more gap bins.
    let mut regions = 0;
    let mut run = 0;
    for &gap in gaps {
        match gap {
            true => run += 1,
            false => {
                if run >= 2 {
                    regions += 1;
                }
                run = 0;
            }
        }
    }
    if run >= 2 {
        regions += 1;
    }

    // Count sparse interior bins undercutting both neighbors.
    let valleys = histogram
        .iter()
        .copied()
        .tuple_windows()
        .filter(|&(left, center, right)| {
            (center as f64) < 0.3 * expected
                && (center as f64) < 0.5 * left as f64
                && (center as f64) < 0.5 * right as f64
        })
        .count();

    GapEvidence { regions, valleys }
}

/// Smooth a histogram with a Gaussian kernel of the given bandwidth (bins).
fn smooth(histogram: &[usize], bandwidth: f64) -> Vec<f64> {
    let radius = f64::ceil(3. * bandwidth) as isize;
    let bins = histogram.len() as isize;

    (0..bins)
        .map(|i| {
            let mut value = 0.;
            let mut weight = 0.;
            for j in i - radius..=i + radius {
                if (0..bins).contains(&j) {
                    let z = (i - j) as f64 / bandwidth;
                    let w = libm::exp(-0.5 * z * z);
                    value += w * histogram[j as usize] as f64;
                    weight += w;
                }
            }

            value / weight
        })
        .collect()
}

/// Local maxima above a prominence fraction of the tallest bin.
fn find_peaks(smoothed: &[f64], prominence: f64) -> Vec<usize> {
    let tallest = smoothed.iter().fold(0., |a: f64, &b| f64::max(a, b));
    let floor = prominence * tallest;

    (0..smoothed.len())
        .filter(|&i| {
            let left = if i > 0 { smoothed[i - 1] } else { f64::NEG_INFINITY };
            let right = if i + 1 < smoothed.len() {
                smoothed[i + 1]
            } else {
                f64::NEG_INFINITY
            };

            smoothed[i] >= left && smoothed[i] > right && smoothed[i] >= floor
        })
        .collect()
}

/// Merge peak pairs closer than the minimum separation, keeping the taller.
fn merge_close_peaks(peaks: &mut Vec<usize>, smoothed: &[f64], min_separation: usize) {
    let mut merged = true;
    while merged && peaks.len() > 1 {
        merged = false;
        for i in 0..peaks.len() - 1 {
            if peaks[i + 1] - peaks[i] < min_separation {
                // Keep the taller of the pair.
                let drop = match smoothed[peaks[i]] >= smoothed[peaks[i + 1]] {
                    true => i + 1,
                    false => i,
                };
                peaks.remove(drop);
                merged = true;
                break;
            }
        }
    }
}

/// Require a valley between surviving peaks: the minimum smoothed value
/// between two peaks must undercut a fraction of the shorter peak.
fn filter_valleys(peaks: &mut Vec<usize>, smoothed: &[f64], fraction: f64) {
    let mut filtered = true;
    while filtered && peaks.len() > 1 {
        filtered = false;
        for i in 0..peaks.len() - 1 {
            let (a, b) = (peaks[i], peaks[i + 1]);
            let valley = smoothed[a..=b].iter().fold(f64::INFINITY, |m, &v| f64::min(m, v));
            let shorter = f64::min(smoothed[a], smoothed[b]);

            if valley >= fraction * shorter {
                // No valley: drop the shorter of the pair.
                let drop = match smoothed[a] >= smoothed[b] {
                    true => i + 1,
                    false => i,
                };
                peaks.remove(drop);
                filtered = true;
                break;
            }
        }
    }
}

/// Centers of contiguous non-gap regions, as bin indices.
fn non_gap_centers(gaps: &[bool]) -> Vec<usize> {
    let mut centers = Vec::new();
    let mut start = None;

    for (i, &gap) in gaps.iter().enumerate() {
        match (gap, start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                centers.push((s + i - 1) / 2);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        centers.push((s + gaps.len() - 1) / 2);
    }

    centers
}

/// Nearest-peak sample assignment, as normalized mode weights.
fn mode_weights(sorted: &[f64], locations: &[f64]) -> Vec<f64> {
    let n = sorted.len() as f64;

    // Midpoints between consecutive peaks split the sorted sample.
    let mut weights = Vec::with_capacity(locations.len());
    let mut start = 0;
    for i in 0..locations.len() {
        let end = match i + 1 < locations.len() {
            true => {
                let boundary = 0.5 * (locations[i] + locations[i + 1]);
                sorted.partition_point(|&v| v < boundary)
            }
            false => sorted.len(),
        };
        weights.push((end - start) as f64 / n);
        start = end;
    }

    weights
}
