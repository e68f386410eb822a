use crate::{estimators::FitResult, stats::DimensionStatistics};

mod best_fit;
pub use best_fit::*;

mod pearson;
pub use pearson::*;

mod refinement;
pub use refinement::*;

/// A per-dimension model selection policy.
///
/// Implemented by the one-shot best-fit selector and the iterative refiner;
/// the extraction orchestrator is generic over this seam.
pub trait SelectionStrategy: Send + Sync {
    /// Pick the winning fit for one dimension.
    fn select(&self, statistics: &DimensionStatistics, sorted: &[f64]) -> FitResult;

    /// Pick the winning fit and expose the full per-fitter score vector,
    /// when the strategy has one.
    fn select_scored(
        &self,
        statistics: &DimensionStatistics,
        sorted: &[f64],
    ) -> (FitResult, Option<Vec<f64>>) {
        (self.select(statistics, sorted), None)
    }

    /// Number of configured fitters; zero when not applicable.
    fn fitter_count(&self) -> usize {
        0
    }
}
