use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
    time::Instant,
};

use log::debug;
use ndarray::prelude::*;
use rayon::prelude::*;

use super::{AllFits, Extraction, StateObserver};
use crate::{
    datasets::VectorSet,
    error::{ExtractError, InputError},
    estimators::FitResult,
    models::VectorSpaceModel,
    selection::SelectionStrategy,
    stats::{
        interleave, BatchedMoments, ConvergenceDetector, DimensionStatistics, MomentAccumulator,
        LANES,
    },
};

/// Progress callback: `(progress in [0, 1], message) -> continue?`.
///
/// Invoked at most once per batch; returning false cancels the extraction.
pub type ProgressCallback<'a> = Box<dyn FnMut(f64, &str) -> bool + Send + 'a>;

/// Everything one dimension produces.
type DimensionFit = (DimensionStatistics, FitResult, Option<Vec<f64>>);

/// Worker count rule for the parallel mode.
fn default_thread_count() -> usize {
    let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);

    usize::max(cores.saturating_sub(10), 1)
}

/// Extraction orchestrator.
///
/// Drives every dimension of a [`VectorSet`] through statistics collection
/// and model selection. Three execution modes share one contract (one scalar
/// model per dimension): [`call`](Extractor::call) runs serially,
/// [`call_converging`](Extractor::call_converging) consumes the input in
/// order and stops early once every dimension's moments converge, and
/// [`par_call`](Extractor::par_call) partitions dimensions over a dedicated
/// thread pool, sweeping eight dimensions at a time through the batched
/// accumulator.
pub struct Extractor<'a, S> {
    strategy: S,
    batch_size: usize,
    update_interval: usize,
    convergence_tolerance: f64,
    threads: Option<usize>,
    all_fits: bool,
    observer: Option<&'a dyn StateObserver>,
    progress: Option<Mutex<ProgressCallback<'a>>>,
}

impl<'a, S: SelectionStrategy> Extractor<'a, S> {
    /// Construct an extractor around a selection strategy.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            batch_size: 64,
            update_interval: 1_000,
            convergence_tolerance: 0.05,
            threads: None,
            all_fits: false,
            observer: None,
            progress: None,
        }
    }

    /// Set the number of dimensions per parallel task.
    #[inline]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        // Assert the batch size is positive.
        assert!(batch_size > 0, "Batch size must be positive.");
        // Set batch size.
        self.batch_size = batch_size;

        self
    }

    /// Set the accumulator checkpoint interval.
    #[inline]
    pub fn with_update_interval(mut self, update_interval: usize) -> Self {
        // Assert the interval is positive.
        assert!(update_interval > 0, "Update interval must be positive.");
        // Set update interval.
        self.update_interval = update_interval;

        self
    }

    /// Set the convergence tolerance used by the converging mode.
    #[inline]
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        // Assert the tolerance is positive.
        assert!(tolerance > 0., "Convergence tolerance must be positive.");
        // Set convergence tolerance.
        self.convergence_tolerance = tolerance;

        self
    }

    /// Set an explicit worker count for the parallel mode.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        // Assert the worker count is positive.
        assert!(threads > 0, "Worker count must be positive.");
        // Set worker count.
        self.threads = Some(threads);

        self
    }

    /// Collect the per-fitter score matrix alongside the winners.
    #[inline]
    pub fn with_all_fits(mut self, all_fits: bool) -> Self {
        // Set the diagnostic flag.
        self.all_fits = all_fits;

        self
    }

    /// Attach a state observer.
    #[inline]
    pub fn with_observer(mut self, observer: &'a dyn StateObserver) -> Self {
        // Set observer.
        self.observer = Some(observer);

        self
    }

    /// Attach a progress callback.
    #[inline]
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(f64, &str) -> bool + Send + 'a,
    {
        // Set progress callback.
        self.progress = Some(Mutex::new(Box::new(progress)));

        self
    }

    /// Fail fast on malformed input.
    fn validate(set: &VectorSet) -> Result<(), InputError> {
        match set.is_empty() {
            true => Err(InputError::Empty),
            false => Ok(()),
        }
    }

    /// Invoke the progress callback, defaulting to continue.
    fn report_progress(&self, progress: f64, message: &str) -> bool {
        match &self.progress {
            None => true,
            Some(callback) => {
                let mut callback = callback.lock().expect("Progress callback lock poisoned");

                (*callback)(progress, message)
            }
        }
    }

    /// Collect statistics, select a model and fire the observer hooks for
    /// one dimension with precomputed statistics.
    fn fit_dimension(
        &self,
        set: &VectorSet,
        d: usize,
        statistics: DimensionStatistics,
    ) -> DimensionFit {
        let sorted = set.sorted_dimension(d);

        let (result, scores) = match self.all_fits {
            true => self.strategy.select_scored(&statistics, &sorted),
            false => (self.strategy.select(&statistics, &sorted), None),
        };

        if let Some(observer) = self.observer {
            observer.on_dimension_complete(d, result.model());
        }

        (statistics, result, scores)
    }

    /// Assemble the extraction outcome from per-dimension parts.
    fn assemble(&self, n: usize, parts: Vec<DimensionFit>, elapsed_ms: f64) -> Extraction {
        let dimensions = parts.len();

        let mut statistics = Vec::with_capacity(dimensions);
        let mut fits = Vec::with_capacity(dimensions);
        let mut scores = Vec::new();
        for (s, fit, row) in parts {
            statistics.push(s);
            fits.push(fit);
            if let Some(row) = row {
                scores.extend(row);
            }
        }

        let models = fits.iter().map(|f| f.model().clone()).collect();
        let model = VectorSpaceModel::new(models, n);

        // Attach the diagnostic matrix when every dimension reported scores.
        let fitters = self.strategy.fitter_count();
        let all_fits = match self.all_fits && fitters > 0 && scores.len() == dimensions * fitters {
            true => Some(AllFits::new(
                Array2::from_shape_vec((dimensions, fitters), scores)
                    .expect("Score matrix is rectangular"),
            )),
            false => None,
        };

        Extraction::new(model, statistics, fits, elapsed_ms, all_fits)
    }

    /// Serial extraction.
    pub fn call(&self, set: &VectorSet) -> Result<Extraction, ExtractError> {
        Self::validate(set)?;
        let start = Instant::now();

        let dimensions = set.dimensions();
        let mut parts = Vec::with_capacity(dimensions);
        for d in 0..dimensions {
            if let Some(observer) = self.observer {
                observer.on_dimension_start(d);
            }

            // Accumulate moments with periodic observer updates.
            let mut accumulator = MomentAccumulator::new();
            for (i, &v) in set.dimension(d).iter().enumerate() {
                accumulator.add(v as f64);
                if (i + 1) % self.update_interval == 0 {
                    if let Some(observer) = self.observer {
                        observer.on_accumulator_update(d, &accumulator.statistics(d));
                    }
                }
            }

            parts.push(self.fit_dimension(set, d, accumulator.statistics(d)));

            // One progress report per dimension; false cancels.
            let progress = (d + 1) as f64 / dimensions as f64;
            if !self.report_progress(progress, &format!("dimension {} of {}", d + 1, dimensions)) {
                return Err(ExtractError::Cancelled);
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        Ok(self.assemble(set.len(), parts, elapsed_ms))
    }

    /// Convergence-driven extraction.
    ///
    /// Consumes vectors in input order; once every dimension's detector
    /// reports convergence at a checkpoint, no further input is read and the
    /// models are fitted on the consumed prefix.
    pub fn call_converging(&self, set: &VectorSet) -> Result<Extraction, ExtractError> {
        Self::validate(set)?;
        let start = Instant::now();

        let n = set.len();
        let dimensions = set.dimensions();

        // One detector per dimension.
        let mut detectors: Vec<ConvergenceDetector> = (0..dimensions)
            .map(|_| {
                ConvergenceDetector::new()
                    .with_interval(self.update_interval)
                    .with_tolerance(self.convergence_tolerance)
            })
            .collect();

        // Consume the stream, stopping early on global convergence.
        let mut consumed = n;
        for i in 0..n {
            for (d, detector) in detectors.iter_mut().enumerate() {
                detector.add(set[[d, i]] as f64);
            }
            if (i + 1) % self.update_interval == 0
                && detectors.iter().all(ConvergenceDetector::converged)
            {
                consumed = i + 1;
                debug!("convergence early stop after {} of {} vectors", consumed, n);
                break;
            }
        }

        // Fit every dimension on the consumed prefix.
        let mut parts = Vec::with_capacity(dimensions);
        for (d, detector) in detectors.iter().enumerate() {
            if let Some(observer) = self.observer {
                observer.on_dimension_start(d);
            }

            let statistics = detector.statistics(d);
            if let Some(observer) = self.observer {
                observer.on_accumulator_update(d, &statistics);
            }

            let mut sorted: Vec<f64> = set
                .dimension(d)
                .iter()
                .take(consumed)
                .map(|&v| v as f64)
                .collect();
            sorted.sort_unstable_by(f64::total_cmp);

            let (result, scores) = match self.all_fits {
                true => self.strategy.select_scored(&statistics, &sorted),
                false => (self.strategy.select(&statistics, &sorted), None),
            };

            if let Some(observer) = self.observer {
                observer.on_dimension_complete(d, result.model());
            }
            parts.push((statistics, result, scores));

            let progress = (d + 1) as f64 / dimensions as f64;
            if !self.report_progress(progress, &format!("dimension {} of {}", d + 1, dimensions)) {
                return Err(ExtractError::Cancelled);
            }
        }

        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        Ok(self.assemble(n, parts, elapsed_ms))
    }

    /// Parallel extraction.
    ///
    /// Dimensions are partitioned into batches and distributed over a
    /// dedicated pool; within a batch, runs of eight dimensions advance in
    /// lockstep through the batched accumulator. Workers write disjoint
    /// output positions, so the only shared state is the progress counter
    /// and the cancellation flag.
    pub fn par_call(&self, set: &VectorSet) -> Result<Extraction, ExtractError> {
        Self::validate(set)?;
        let start = Instant::now();

        let dimensions = set.dimensions();
        let threads = self.threads.unwrap_or_else(default_thread_count);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("Failed to build the worker pool.");

        // Partition dimensions into batches.
        let batches: Vec<(usize, usize)> = (0..dimensions)
            .step_by(self.batch_size)
            .map(|b| (b, usize::min(b + self.batch_size, dimensions)))
            .collect();
        debug!("parallel extraction: {} batches over {} workers", batches.len(), threads);

        let completed = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);

        let results: Vec<Vec<DimensionFit>> = pool.install(|| {
            batches
                .par_iter()
                .map(|&(from, to)| {
                    // Cancellation is checked between batches.
                    if cancelled.load(Ordering::Relaxed) {
                        return Vec::new();
                    }

                    let parts = self.process_batch(set, from, to);

                    // One progress report per completed batch.
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    let progress = done as f64 / batches.len() as f64;
                    if !self.report_progress(progress, &format!("batch {} of {}", done, batches.len()))
                    {
                        cancelled.store(true, Ordering::Relaxed);
                    }

                    parts
                })
                .collect()
        });

        if cancelled.load(Ordering::Relaxed) {
            return Err(ExtractError::Cancelled);
        }

        let parts: Vec<DimensionFit> = results.into_iter().flatten().collect();
        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        Ok(self.assemble(set.len(), parts, elapsed_ms))
    }

    /// Process one batch of dimensions, eight at a time.
    fn process_batch(&self, set: &VectorSet, from: usize, to: usize) -> Vec<DimensionFit> {
        let dims: Vec<usize> = (from..to).collect();
        let mut parts = Vec::with_capacity(dims.len());
        let mut buffer = Vec::new();

        for chunk in dims.chunks(LANES) {
            if let Some(observer) = self.observer {
                chunk.iter().for_each(|&d| observer.on_dimension_start(d));
            }

            if chunk.len() == LANES {
                // Full chunk: interleave and sweep all eight lanes at once.
                let columns: [&[f32]; LANES] = std::array::from_fn(|i| {
                    set.dimension(chunk[i])
                        .to_slice()
                        .expect("Dimension rows are contiguous")
                });
                interleave(&columns, &mut buffer);

                let mut batched = BatchedMoments::new();
                batched.update_interleaved(&buffer);
                let statistics = batched.statistics(chunk[0]);

                for (offset, &d) in chunk.iter().enumerate() {
                    if let Some(observer) = self.observer {
                        observer.on_accumulator_update(d, &statistics[offset]);
                    }
                    parts.push(self.fit_dimension(set, d, statistics[offset]));
                }
            } else {
                // Tail chunk: scalar accumulators.
                for &d in chunk {
                    let mut accumulator = MomentAccumulator::new();
                    set.dimension(d).iter().for_each(|&v| accumulator.add(v as f64));

                    let statistics = accumulator.statistics(d);
                    if let Some(observer) = self.observer {
                        observer.on_accumulator_update(d, &statistics);
                    }
                    parts.push(self.fit_dimension(set, d, statistics));
                }
            }
        }

        parts
    }
}
