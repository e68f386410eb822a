use serde::{Deserialize, Serialize};

/// Histogram-backed empirical distribution model.
///
/// The CDF is piecewise-linear between bin boundaries; the quantile function
/// inverts it segment by segment. Degenerate histograms (a single repeated
/// value) step at the single support point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalModel {
    boundaries: Vec<f64>,
    cumulative: Vec<f64>,
}

impl EmpiricalModel {
    /// Construct an empirical model from bin boundaries and normalized
    /// cumulative mass at each boundary.
    pub fn new(boundaries: Vec<f64>, cumulative: Vec<f64>) -> Self {
        // Assert there is at least one bin.
        assert!(boundaries.len() >= 2, "Histogram must have at least one bin.");
        // Assert boundaries and cumulative mass are aligned.
        assert!(
            boundaries.len() == cumulative.len(),
            "Boundaries and cumulative mass must be aligned."
        );
        // Assert boundaries are sorted.
        assert!(
            boundaries.windows(2).all(|w| w[0] <= w[1]),
            "Boundaries must be sorted."
        );
        // Assert the cumulative mass is a CDF.
        assert!(
            cumulative[0] == 0. && f64::abs(cumulative[cumulative.len() - 1] - 1.) < 1e-9,
            "Cumulative mass must start at zero and end at one."
        );
        assert!(
            cumulative.windows(2).all(|w| w[0] <= w[1]),
            "Cumulative mass must be non-decreasing."
        );

        Self {
            boundaries,
            cumulative,
        }
    }

    /// Construct from bin boundaries and per-bin counts.
    pub fn from_counts(boundaries: Vec<f64>, counts: &[usize]) -> Self {
        // Assert counts match the bins.
        assert!(
            boundaries.len() == counts.len() + 1,
            "Counts must match the number of bins."
        );

        let total: usize = counts.iter().sum();
        // Assert the histogram is not empty.
        assert!(total > 0, "Histogram must hold at least one sample.");

        // Accumulate normalized mass.
        let mut cumulative = Vec::with_capacity(boundaries.len());
        cumulative.push(0.);
        let mut running = 0usize;
        for &count in counts {
            running += count;
            cumulative.push(running as f64 / total as f64);
        }
        // Pin the final mass to exactly one.
        let last = cumulative.len() - 1;
        cumulative[last] = 1.;

        Self::new(boundaries, cumulative)
    }

    /// Bin boundaries.
    #[inline]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Cumulative mass at each boundary.
    #[inline]
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Cumulative distribution function at x.
    pub fn cdf(&self, x: f64) -> f64 {
        let first = self.boundaries[0];
        let last = self.boundaries[self.boundaries.len() - 1];

        if x >= last {
            return 1.;
        }
        if x <= first {
            return 0.;
        }

        // Locate the segment and interpolate linearly inside it.
        let i = self.boundaries.partition_point(|&b| b <= x);
        let (b0, b1) = (self.boundaries[i - 1], self.boundaries[i]);
        let (c0, c1) = (self.cumulative[i - 1], self.cumulative[i]);
        let t = match b1 > b0 {
            true => (x - b0) / (b1 - b0),
            false => 1.,
        };

        c0 + t * (c1 - c0)
    }

    /// Quantile function at u in (0, 1).
    pub fn inverse_cdf(&self, u: f64) -> f64 {
        // Locate the first boundary at or above the target mass.
        let i = self.cumulative.partition_point(|&c| c < u);
        if i == 0 {
            return self.boundaries[0];
        }

        let (b0, b1) = (self.boundaries[i - 1], self.boundaries[i]);
        let (c0, c1) = (self.cumulative[i - 1], self.cumulative[i]);

        // Flat segments collapse to their left boundary.
        match c1 > c0 {
            true => b0 + (u - c0) / (c1 - c0) * (b1 - b0),
            false => b0,
        }
    }

    /// Named parameters: the support bounds and the bin count.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("min", self.boundaries[0]),
            ("max", self.boundaries[self.boundaries.len() - 1]),
            ("bins", (self.boundaries.len() - 1) as f64),
        ]
    }

    /// Number of free parameters: one mass per bin.
    #[inline]
    pub fn parameter_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Characteristic location: the median.
    #[inline]
    pub fn location(&self) -> f64 {
        self.inverse_cdf(0.5)
    }
}
