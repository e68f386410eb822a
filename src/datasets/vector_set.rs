use std::ops::Deref;

use ndarray::prelude::*;

use crate::error::InputError;

/// Cache tile edge for the blocked transpose, sized for L2 friendliness.
const TILE: usize = 256;

/// Data set of numeric vectors, stored dimension-major.
///
/// Input arrives either row-major (one vector per row) or column-major
/// (already transposed); internally the data is always dimension-major, so
/// `self[[d, i]]` is the value of dimension d in vector i.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorSet {
    data: Array2<f32>,
}

impl Deref for VectorSet {
    type Target = Array2<f32>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl VectorSet {
    /// Construct a vector set from a row-major `[N][D]` view.
    ///
    /// The input is transposed tile-by-tile so both the read and the write
    /// side stay cache-resident.
    pub fn from_rows(rows: ArrayView2<f32>) -> Self {
        let (n, d) = rows.dim();

        // Allocate the dimension-major matrix.
        let mut data = Array2::zeros((d, n));

        // Transpose in TILE x TILE blocks.
        for bi in (0..n).step_by(TILE) {
            for bj in (0..d).step_by(TILE) {
                for i in bi..usize::min(bi + TILE, n) {
                    for j in bj..usize::min(bj + TILE, d) {
                        data[[j, i]] = rows[[i, j]];
                    }
                }
            }
        }

        Self { data }
    }

    /// Construct a vector set from an already dimension-major `[D][N]` matrix.
    ///
    /// The matrix is rearranged into standard layout if needed, so dimension
    /// rows are always contiguous.
    #[inline]
    pub fn from_columns(columns: Array2<f32>) -> Self {
        Self {
            data: columns.as_standard_layout().into_owned(),
        }
    }

    /// Construct a vector set from row-major slices, validating shape.
    ///
    /// # Errors
    ///
    /// [`InputError::Empty`] when there are no vectors or no dimensions,
    /// [`InputError::Jagged`] when any row length differs from the first.
    pub fn try_from_rows(rows: &[Vec<f32>]) -> Result<Self, InputError> {
        // Check for empty input.
        if rows.is_empty() || rows[0].is_empty() {
            return Err(InputError::Empty);
        }

        // Check for jagged rows.
        let expected = rows[0].len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(InputError::Jagged {
                    row,
                    expected,
                    found: values.len(),
                });
            }
        }

        // Assemble the row-major matrix, then transpose.
        let flat: Vec<f32> = rows.iter().flatten().copied().collect();
        let rows = Array2::from_shape_vec((rows.len(), expected), flat)
            .expect("Failed to shape validated input");

        Ok(Self::from_rows(rows.view()))
    }

    /// Number of dimensions D.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.data.nrows()
    }

    /// Number of vectors N.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.ncols()
    }

    /// Whether the set holds no vectors or no dimensions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values of dimension d, in input order.
    #[inline]
    pub fn dimension(&self, d: usize) -> ArrayView1<f32> {
        self.data.row(d)
    }

    /// Values of dimension d widened to f64, sorted ascending.
    pub fn sorted_dimension(&self, d: usize) -> Vec<f64> {
        let mut values: Vec<f64> = self.dimension(d).iter().map(|&v| v as f64).collect();
        values.sort_unstable_by(f64::total_cmp);

        values
    }
}
