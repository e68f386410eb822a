use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::ScalarModel;

/// Vector-space statistical model.
///
/// An ordered per-dimension sequence of scalar models plus the target
/// unique-vector count. Created by the extraction orchestrator, immutable
/// thereafter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorSpaceModel {
    models: Vec<ScalarModel>,
    target_unique: usize,
}

impl VectorSpaceModel {
    /// Construct a vector-space model.
    #[inline]
    pub fn new(models: Vec<ScalarModel>, target_unique: usize) -> Self {
        // Assert there is at least one dimension.
        assert!(!models.is_empty(), "Model must have at least one dimension.");

        Self {
            models,
            target_unique,
        }
    }

    /// Number of dimensions D.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.models.len()
    }

    /// The per-dimension scalar models.
    #[inline]
    pub fn models(&self) -> &[ScalarModel] {
        &self.models
    }

    /// Target unique-vector count for downstream synthesis.
    #[inline]
    pub fn target_unique(&self) -> usize {
        self.target_unique
    }
}

impl Index<usize> for VectorSpaceModel {
    type Output = ScalarModel;

    #[inline]
    fn index(&self, d: usize) -> &Self::Output {
        &self.models[d]
    }
}
