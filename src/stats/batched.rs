use super::{DimensionStatistics, MomentAccumulator};

/// Number of interleaved lanes processed per sweep.
pub const LANES: usize = 8;

/// Interleave eight equally long dimension slices into `out`.
///
/// The produced layout is `[d0v0, d1v0, .., d7v0, d0v1, ..]`: one frame of
/// eight lanes per input index, so a lane-wise sweep reads contiguous memory
/// without gather loads.
pub fn interleave(columns: &[&[f32]; LANES], out: &mut Vec<f64>) {
    let len = columns[0].len();
    // Assert all lanes have the same length.
    assert!(
        columns.iter().all(|c| c.len() == len),
        "Interleaved lanes must have equal lengths."
    );

    out.clear();
    out.reserve(len * LANES);
    for i in 0..len {
        for column in columns {
            out.push(column[i] as f64);
        }
    }
}

/// Eight moment accumulators advanced in lockstep.
///
/// The lane state is kept in `[f64; LANES]` arrays and every per-frame update
/// is a fixed-count loop over the lanes, which keeps the hot path free of
/// branches and amenable to 8-wide vectorization.
#[derive(Clone, Debug)]
pub struct BatchedMoments {
    n: usize,
    mean: [f64; LANES],
    m2: [f64; LANES],
    m3: [f64; LANES],
    m4: [f64; LANES],
    min: [f64; LANES],
    max: [f64; LANES],
}

impl Default for BatchedMoments {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl BatchedMoments {
    /// Construct an empty eight-lane accumulator.
    #[inline]
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: [0.; LANES],
            m2: [0.; LANES],
            m3: [0.; LANES],
            m4: [0.; LANES],
            min: [f64::INFINITY; LANES],
            max: [f64::NEG_INFINITY; LANES],
        }
    }

    /// Advance all lanes by one frame of values.
    pub fn update(&mut self, frame: &[f64; LANES]) {
        self.n += 1;
        let n = self.n as f64;
        let c4 = n * n - 3. * n + 3.;

        for l in 0..LANES {
            let delta = frame[l] - self.mean[l];
            let delta_n = delta / n;
            let delta_n2 = delta_n * delta_n;
            let term = delta * delta_n * (n - 1.);

            // Same update order as the scalar accumulator: M4, M3, M2, mean.
            self.m4[l] += term * delta_n2 * c4 + 6. * delta_n2 * self.m2[l]
                - 4. * delta_n * self.m3[l];
            self.m3[l] += term * delta_n * (n - 2.) - 3. * delta_n * self.m2[l];
            self.m2[l] += term;
            self.mean[l] += delta_n;

            self.min[l] = f64::min(self.min[l], frame[l]);
            self.max[l] = f64::max(self.max[l], frame[l]);
        }
    }

    /// Sweep an interleaved buffer produced by [`interleave`].
    pub fn update_interleaved(&mut self, buffer: &[f64]) {
        // Assert the buffer holds whole frames.
        assert!(
            buffer.len() % LANES == 0,
            "Interleaved buffer length must be a multiple of the lane count."
        );

        for frame in buffer.chunks_exact(LANES) {
            let frame: &[f64; LANES] = frame.try_into().expect("Frame width mismatch");
            self.update(frame);
        }
    }

    /// Number of frames accumulated per lane.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Freeze lane `l` into a scalar accumulator.
    fn lane(&self, l: usize) -> MomentAccumulator {
        MomentAccumulator::from_raw(
            self.n,
            self.mean[l],
            self.m2[l],
            self.m3[l],
            self.m4[l],
            self.min[l],
            self.max[l],
        )
    }

    /// Freeze all lanes into statistics records for dimensions
    /// `base..base + LANES`.
    pub fn statistics(&self, base: usize) -> [DimensionStatistics; LANES] {
        std::array::from_fn(|l| self.lane(l).statistics(base + l))
    }
}
