use crate::{models::ScalarModel, stats::DimensionStatistics};

/// Observer of per-dimension extraction state.
///
/// All hooks default to no-ops. In parallel extraction the hooks are invoked
/// from worker threads, hence the `Send + Sync` bound; implementations must
/// not block.
pub trait StateObserver: Send + Sync {
    /// A dimension has started processing.
    fn on_dimension_start(&self, _d: usize) {}

    /// A dimension's accumulator has advanced.
    fn on_accumulator_update(&self, _d: usize, _statistics: &DimensionStatistics) {}

    /// A dimension has completed with its winning model.
    fn on_dimension_complete(&self, _d: usize, _model: &ScalarModel) {}
}
