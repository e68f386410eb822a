use ndarray::prelude::*;
use ndarray_stats::QuantileExt;

use crate::{
    estimators::FitResult,
    models::VectorSpaceModel,
    stats::DimensionStatistics,
};

/// Diagnostic matrix of per-fitter scores over all dimensions.
///
/// Row d holds the penalized score of every configured fitter on dimension
/// d (infinite where a fitter was dropped). Sparkline strings are storage
/// for external formatting; the core never renders them.
#[derive(Clone, Debug)]
pub struct AllFits {
    scores: Array2<f64>,
    best: Vec<usize>,
    sparklines: Option<Vec<String>>,
}

impl AllFits {
    /// Construct the diagnostic from a D x K score matrix.
    pub fn new(scores: Array2<f64>) -> Self {
        // Assert the matrix is non-empty.
        assert!(!scores.is_empty(), "Score matrix must be non-empty.");

        // Best fitter per dimension by minimum score.
        let best = scores
            .rows()
            .into_iter()
            .map(|row| row.argmin().expect("Scores are never NaN"))
            .collect();

        Self {
            scores,
            best,
            sparklines: None,
        }
    }

    /// The D x K score matrix.
    #[inline]
    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    /// Index of the best-scoring fitter per dimension.
    #[inline]
    pub fn best(&self) -> &[usize] {
        &self.best
    }

    /// Per-dimension sparkline strings, when attached.
    #[inline]
    pub fn sparklines(&self) -> Option<&[String]> {
        self.sparklines.as_deref()
    }

    /// Attach externally rendered per-dimension sparkline strings.
    pub fn set_sparklines(&mut self, sparklines: Vec<String>) {
        // Assert one sparkline per dimension.
        assert!(
            sparklines.len() == self.scores.nrows(),
            "Sparklines must match the number of dimensions."
        );
        // Set sparklines.
        self.sparklines = Some(sparklines);
    }
}

/// Full outcome of an extraction call.
#[derive(Clone, Debug)]
pub struct Extraction {
    model: VectorSpaceModel,
    statistics: Vec<DimensionStatistics>,
    fits: Vec<FitResult>,
    elapsed_ms: f64,
    all_fits: Option<AllFits>,
}

impl Extraction {
    /// Assemble an extraction outcome.
    pub(crate) fn new(
        model: VectorSpaceModel,
        statistics: Vec<DimensionStatistics>,
        fits: Vec<FitResult>,
        elapsed_ms: f64,
        all_fits: Option<AllFits>,
    ) -> Self {
        // Assert the per-dimension arrays are aligned.
        assert!(
            model.dimensions() == statistics.len() && model.dimensions() == fits.len(),
            "Per-dimension arrays must be aligned."
        );

        Self {
            model,
            statistics,
            fits,
            elapsed_ms,
            all_fits,
        }
    }

    /// The extracted vector-space model.
    #[inline]
    pub fn model(&self) -> &VectorSpaceModel {
        &self.model
    }

    /// Per-dimension summary statistics.
    #[inline]
    pub fn statistics(&self) -> &[DimensionStatistics] {
        &self.statistics
    }

    /// Per-dimension winning fits.
    #[inline]
    pub fn fits(&self) -> &[FitResult] {
        &self.fits
    }

    /// Wall-clock extraction time in milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Diagnostic score matrix, when collected.
    #[inline]
    pub fn all_fits(&self) -> Option<&AllFits> {
        self.all_fits.as_ref()
    }

    /// Consume the outcome, yielding the model.
    #[inline]
    pub fn into_model(self) -> VectorSpaceModel {
        self.model
    }
}
