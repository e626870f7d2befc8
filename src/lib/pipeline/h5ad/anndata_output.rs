//! In-memory annotated matrix for a STARSolo run and its h5ad serialization.

use crate::core::error::{Result, SoloError};
use crate::core::fs::make_parent_dirs;
use crate::core::sparse::SparseOps;
use anndata::data::array::dataframe::DataFrameIndex;
use anndata::{AnnData, AnnDataOp, AxisArraysOp};
use anndata_hdf5::H5;
use log::{info, warn};
use nalgebra_sparse::CsrMatrix;
use polars::prelude::*;
use rustc_hash::FxHashSet;
use std::path::Path;

/// How a missing cell identifier is rendered in the on-disk obs index.
pub const MISSING_NAME: &str = "nan";

/// var column holding the stable gene identifiers.
pub const GENE_ID_COLUMN: &str = "ensemble_id";

pub const SPLICED_LAYER: &str = "spliced";
pub const UNSPLICED_LAYER: &str = "unspliced";

/// Cells × genes counts with labels, ready to be written as h5ad.
#[derive(Debug, Clone)]
pub struct SoloAnnData {
    /// Mapped cell identifiers; `None` for barcodes absent from the mapping.
    pub obs_names: Vec<Option<String>>,
    /// Raw barcodes in row order.
    pub barcodes: Vec<String>,
    pub var_names: Vec<String>,
    pub gene_ids: Vec<String>,
    pub x: CsrMatrix<u32>,
    /// Named layers in write order.
    pub layers: Vec<(String, CsrMatrix<u32>)>,
}

impl SoloAnnData {
    pub fn n_obs(&self) -> usize {
        self.obs_names.len()
    }

    pub fn n_vars(&self) -> usize {
        self.var_names.len()
    }

    pub fn layer(&self, name: &str) -> Option<&CsrMatrix<u32>> {
        self.layers
            .iter()
            .find(|(layer_name, _)| layer_name == name)
            .map(|(_, matrix)| matrix)
    }

    /// Check that every label array and matrix agrees on `n_obs × n_vars`.
    pub fn validate_dimensions(&self) -> Result<()> {
        let (n_obs, n_vars) = (self.n_obs(), self.n_vars());

        if self.barcodes.len() != n_obs {
            return Err(SoloError::DimensionMismatch {
                expected: format!("barcodes length = {}", n_obs),
                actual: format!("barcodes length = {}", self.barcodes.len()),
            });
        }

        if self.gene_ids.len() != n_vars {
            return Err(SoloError::DimensionMismatch {
                expected: format!("gene_ids length = {}", n_vars),
                actual: format!("gene_ids length = {}", self.gene_ids.len()),
            });
        }

        SparseOps::ensure_shape("X", &self.x, n_obs, n_vars)?;
        for (name, matrix) in &self.layers {
            SparseOps::ensure_shape(&format!("layer '{}'", name), matrix, n_obs, n_vars)?;
        }
        Ok(())
    }
}

/// Number of entries that repeat an earlier name.
pub fn count_repeats(names: &[String]) -> usize {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    names.iter().filter(|name| !seen.insert(name.as_str())).count()
}

/// Serialize `adata` to `output_path` as h5ad.
pub fn write_h5ad(adata: &SoloAnnData, output_path: &Path) -> Result<()> {
    adata.validate_dimensions()?;
    make_parent_dirs(output_path)?;

    info!(
        "Writing AnnData with {} cells × {} genes to {:?}",
        adata.n_obs(),
        adata.n_vars(),
        output_path
    );

    let missing = adata.obs_names.iter().filter(|name| name.is_none()).count();
    if missing > 0 {
        warn!(
            "{} barcodes have no cell_id and are indexed as '{}'",
            missing, MISSING_NAME
        );
    }

    let obs_names: Vec<String> = adata
        .obs_names
        .iter()
        .map(|name| name.clone().unwrap_or_else(|| MISSING_NAME.to_string()))
        .collect();
    let repeated_var = count_repeats(&adata.var_names);
    if repeated_var > 0 {
        warn!("{} gene names repeat an earlier var name", repeated_var);
    }
    let var_names = adata.var_names.clone();

    let h5_adata = AnnData::<H5>::new(output_path)?;

    h5_adata.set_obs_names(obs_names.into_iter().collect::<DataFrameIndex>())?;
    h5_adata.set_var_names(var_names.into_iter().collect::<DataFrameIndex>())?;

    h5_adata.set_x(adata.x.clone())?;
    info!("  - Written X matrix with {} non-zeros", adata.x.nnz());

    for (name, matrix) in &adata.layers {
        h5_adata.layers().add(name.as_str(), matrix.clone())?;
        info!("  - Written layer '{}' with {} non-zeros", name, matrix.nnz());
    }

    let obs = DataFrame::new(vec![
        Series::new("barcode".into(), adata.barcodes.clone()).into()
    ])?;
    h5_adata.set_obs(obs)?;

    let var = DataFrame::new(vec![
        Series::new(GENE_ID_COLUMN.into(), adata.gene_ids.clone()).into()
    ])?;
    h5_adata.set_var(var)?;

    h5_adata.close()?;
    info!("Finished writing {:?}", output_path);
    Ok(())
}
