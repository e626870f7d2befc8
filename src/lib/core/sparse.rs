//! Sparse matrix helpers built on nalgebra_sparse

use crate::core::error::{Result, SoloError};
use itertools::Itertools;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

pub struct SparseOps;

impl SparseOps {
    /// Create a CSR matrix from `(row, col, value)` triplets.
    ///
    /// Indices are validated against the requested shape. Duplicate coordinates are summed;
    /// a sum that does not fit in `u32` is rejected.
    pub fn from_triplets_u32(
        nrows: usize,
        ncols: usize,
        triplets: Vec<(usize, usize, u32)>,
    ) -> Result<CsrMatrix<u32>> {
        if nrows == 0 || ncols == 0 || triplets.is_empty() {
            return Ok(CsrMatrix::zeros(nrows, ncols));
        }

        for &(row, col, _) in &triplets {
            if row >= nrows || col >= ncols {
                return Err(SoloError::InvalidInput(format!(
                    "Index ({}, {}) exceeds matrix dimensions ({}, {})",
                    row, col, nrows, ncols
                )));
            }
        }

        let (row_indices, col_indices, values): (Vec<_>, Vec<_>, Vec<_>) =
            merge_duplicates(triplets)?.into_iter().multiunzip();

        let coo = CooMatrix::try_from_triplets(nrows, ncols, row_indices, col_indices, values)
            .map_err(|e| SoloError::SparseMatrix(format!("COO creation failed: {:?}", e)))?;

        Ok(CsrMatrix::from(&coo))
    }

    /// Transpose operation using nalgebra_sparse native transpose
    pub fn transpose_u32(matrix: &CsrMatrix<u32>) -> CsrMatrix<u32> {
        matrix.transpose()
    }

    /// Fail unless `matrix` is exactly `nrows × ncols`.
    pub fn ensure_shape(
        name: &str,
        matrix: &CsrMatrix<u32>,
        nrows: usize,
        ncols: usize,
    ) -> Result<()> {
        if matrix.nrows() != nrows || matrix.ncols() != ncols {
            return Err(SoloError::DimensionMismatch {
                expected: format!("{} {}×{}", name, nrows, ncols),
                actual: format!("{} {}×{}", name, matrix.nrows(), matrix.ncols()),
            });
        }
        Ok(())
    }
}

/// Sort by coordinate and sum repeated entries with overflow checking.
fn merge_duplicates(mut triplets: Vec<(usize, usize, u32)>) -> Result<Vec<(usize, usize, u32)>> {
    triplets.sort_unstable_by_key(|&(row, col, _)| (row, col));

    let mut merged: Vec<(usize, usize, u32)> = Vec::with_capacity(triplets.len());
    for (row, col, value) in triplets {
        match merged.last_mut() {
            Some(last) if last.0 == row && last.1 == col => {
                last.2 = last.2.checked_add(value).ok_or_else(|| {
                    SoloError::InvalidInput(format!(
                        "Summed count at ({}, {}) exceeds {}",
                        row,
                        col,
                        u32::MAX
                    ))
                })?;
            }
            _ => merged.push((row, col, value)),
        }
    }
    Ok(merged)
}
