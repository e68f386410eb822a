/// Re-export datasets.
pub use crate::datasets::*;
/// Re-export errors.
pub use crate::error::*;
/// Re-export estimators.
pub use crate::estimators::*;
/// Re-export extraction.
pub use crate::extraction::*;
/// Re-export functions.
pub use crate::functions::*;
/// Re-export models.
pub use crate::models::*;
/// Re-export selection.
pub use crate::selection::*;
/// Re-export stats.
pub use crate::stats::*;
