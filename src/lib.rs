#![warn(missing_docs)]

//! A hub for vector-space statistical modeling.

/// Vector data sets algorithms and structures.
pub mod datasets;

/// Crate-wide error types.
pub mod error;

/// Distribution estimators algorithms and structures.
pub mod estimators;

/// Extraction orchestration.
pub mod extraction;

/// Special functions and numeric helpers.
pub mod functions;

/// Scalar and vector-space models.
pub mod models;

/// Frequently used items.
pub mod prelude;

/// Model selection algorithms and structures.
pub mod selection;

/// Statistics algorithms and structures.
pub mod stats;
