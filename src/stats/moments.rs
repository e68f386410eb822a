use serde::{Deserialize, Serialize};

/// Summary statistics of a single dimension.
///
/// Immutable record of the first four moments plus extrema. Kurtosis is raw
/// (central fourth moment over $\sigma^4$), not excess. A constant sample
/// reports skewness 0 and kurtosis 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DimensionStatistics {
    index: usize,
    n: usize,
    min: f64,
    max: f64,
    mean: f64,
    variance: f64,
    skewness: f64,
    kurtosis: f64,
}

impl DimensionStatistics {
    /// Construct a new statistics record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        index: usize,
        n: usize,
        min: f64,
        max: f64,
        mean: f64,
        variance: f64,
        skewness: f64,
        kurtosis: f64,
    ) -> Self {
        // Assert variance is non-negative.
        assert!(variance >= 0., "Variance must be non-negative.");

        Self {
            index,
            n,
            min,
            max,
            mean,
            variance,
            skewness,
            kurtosis,
        }
    }

    /// Dimension index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sample count.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Minimum observed value.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum observed value.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Sample mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance.
    #[inline]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Sample skewness $\gamma_1$ .
    #[inline]
    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Raw sample kurtosis $\beta_2$ .
    #[inline]
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    /// Sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        f64::sqrt(self.variance)
    }

    /// Excess kurtosis, i.e. raw kurtosis minus 3.
    #[inline]
    pub fn excess_kurtosis(&self) -> f64 {
        self.kurtosis - 3.
    }

    /// Observed range.
    #[inline]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether the sample is constant.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.variance == 0.
    }
}

/// One-pass fourth-order moment accumulator.
///
/// Numerically stable single-pass update (Welford generalized to the fourth
/// central moment). The per-value update touches M4, then M3, then M2, in
/// that order: later updates read the pre-update state of earlier ones.
#[derive(Clone, Copy, Debug)]
pub struct MomentAccumulator {
    n: usize,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    min: f64,
    max: f64,
}

impl Default for MomentAccumulator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MomentAccumulator {
    /// Construct an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: 0.,
            m2: 0.,
            m3: 0.,
            m4: 0.,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Accumulate a single value.
    pub fn add(&mut self, v: f64) {
        // Assert the value is finite.
        assert!(v.is_finite(), "Accumulated values must be finite.");

        self.n += 1;
        let n = self.n as f64;

        let delta = v - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term = delta * delta_n * (n - 1.);

        // Update M4, M3, M2, mean, in this order.
        self.m4 += term * delta_n2 * (n * n - 3. * n + 3.) + 6. * delta_n2 * self.m2
            - 4. * delta_n * self.m3;
        self.m3 += term * delta_n * (n - 2.) - 3. * delta_n * self.m2;
        self.m2 += term;
        self.mean += delta_n;

        // Track extrema.
        self.min = f64::min(self.min, v);
        self.max = f64::max(self.max, v);
    }

    /// Accumulate a slice of values.
    #[inline]
    pub fn extend(&mut self, values: &[f64]) {
        values.iter().for_each(|&v| self.add(v));
    }

    /// Merge another accumulator into this one (pairwise update).
    pub fn merge(&mut self, other: &Self) {
        // Merging an empty accumulator is a no-op.
        if other.n == 0 {
            return;
        }
        if self.n == 0 {
            *self = *other;
            return;
        }

        let (na, nb) = (self.n as f64, other.n as f64);
        let n = na + nb;
        let delta = other.mean - self.mean;

        let m2 = self.m2 + other.m2 + delta * delta * na * nb / n;
        let m3 = self.m3
            + other.m3
            + delta.powi(3) * na * nb * (na - nb) / (n * n)
            + 3. * delta * (na * other.m2 - nb * self.m2) / n;
        let m4 = self.m4
            + other.m4
            + delta.powi(4) * na * nb * (na * na - na * nb + nb * nb) / (n * n * n)
            + 6. * delta * delta * (na * na * other.m2 + nb * nb * self.m2) / (n * n)
            + 4. * delta * (na * other.m3 - nb * self.m3) / n;

        self.mean += delta * nb / n;
        self.m2 = m2;
        self.m3 = m3;
        self.m4 = m4;
        self.n += other.n;
        self.min = f64::min(self.min, other.min);
        self.max = f64::max(self.max, other.max);
    }

    /// Construct an accumulator from raw lane state.
    pub(crate) fn from_raw(
        n: usize,
        mean: f64,
        m2: f64,
        m3: f64,
        m4: f64,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            n,
            mean,
            m2,
            m3,
            m4,
            min,
            max,
        }
    }

    /// Sample count.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Minimum observed value, or +inf when empty.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Maximum observed value, or -inf when empty.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Running mean.
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Running population variance; zero when empty.
    #[inline]
    pub fn variance(&self) -> f64 {
        match self.n {
            0 => 0.,
            n => self.m2 / n as f64,
        }
    }

    /// Running skewness; zero for constant or empty samples.
    #[inline]
    pub fn skewness(&self) -> f64 {
        match self.m2 > 0. {
            true => f64::sqrt(self.n as f64) * self.m3 / self.m2.powf(1.5),
            false => 0.,
        }
    }

    /// Running raw kurtosis; one for constant or empty samples.
    #[inline]
    pub fn kurtosis(&self) -> f64 {
        match self.m2 > 0. {
            true => self.n as f64 * self.m4 / (self.m2 * self.m2),
            false => 1.,
        }
    }

    /// Freeze the accumulator into a statistics record for dimension `index`.
    pub fn statistics(&self, index: usize) -> DimensionStatistics {
        // Empty accumulators freeze to an all-zero record.
        let (min, max) = match self.n {
            0 => (0., 0.),
            _ => (self.min, self.max),
        };

        DimensionStatistics::new(
            index,
            self.n,
            min,
            max,
            self.mean,
            self.variance(),
            self.skewness(),
            self.kurtosis(),
        )
    }
}
