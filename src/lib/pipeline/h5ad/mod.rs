//! STARSolo count matrices to h5ad
//!
//! Reads the filtered Gene and Velocyto outputs of a STARSolo run, relabels cells through an
//! external barcode → cell_id mapping and writes one AnnData file:
//! - `X`: all counts (cells × genes, stored as unsigned integers)
//! - `layers/spliced`, `layers/unspliced`: Velocyto counts of the same shape
//! - `obs`: mapped cell identifiers as the index (`nan` when unmapped), raw barcodes as the
//!   `barcode` column
//! - `var`: gene names as the index, gene identifiers as the `ensemble_id` column
//!
//! # Key Components
//!
//! - [`layout`]: fixed input locations inside a `Solo.out` directory
//! - [`mtx`]: Matrix Market coordinate reader
//! - [`barcode`]: barcode list and mapping left join
//! - [`features`]: gene table
//! - [`anndata_output`]: in-memory artifact and h5ad writer

pub mod anndata_output;
pub mod barcode;
pub mod features;
pub mod layout;
pub mod mtx;

pub use anndata_output::{write_h5ad, SoloAnnData, SPLICED_LAYER, UNSPLICED_LAYER};
pub use barcode::{read_barcodes, BarcodeMapping};
pub use features::FeatureTable;
pub use layout::SoloLayout;

use crate::core::error::Result;
use crate::core::sparse::SparseOps;
use log::info;
use nalgebra_sparse::CsrMatrix;
use std::path::{Path, PathBuf};

/// Inputs and output of one `make-h5ad` run.
#[derive(Debug, Clone)]
pub struct H5adConfig {
    /// STARSolo `Solo.out` directory.
    pub solo_dir: PathBuf,
    /// CSV with `barcode` and `cell_id` columns.
    pub cell_barcodes_csv: PathBuf,
    /// Destination `.h5ad` path.
    pub output: PathBuf,
}

/// Load every input named by `config` and build the annotated matrix.
pub fn assemble(config: &H5adConfig) -> Result<SoloAnnData> {
    let layout = SoloLayout::new(&config.solo_dir);
    let inputs = layout.resolve()?;

    info!("Loading barcodes from {:?}", inputs.barcodes);
    let barcodes = read_barcodes(&inputs.barcodes)?;

    info!("Loading barcode mapping from {:?}", config.cell_barcodes_csv);
    let mapping = BarcodeMapping::from_csv(&config.cell_barcodes_csv)?;
    let obs_names = mapping.left_join(&barcodes);
    let matched = obs_names.iter().filter(|name| name.is_some()).count();
    info!(
        "Mapped {} of {} barcodes to cell identifiers",
        matched,
        barcodes.len()
    );

    info!("Loading features from {:?}", inputs.features);
    let features = FeatureTable::from_tsv(&inputs.features)?;
    info!("Loaded {} features", features.len());

    let (n_obs, n_vars) = (barcodes.len(), features.len());
    let x = load_cells_by_genes("X", &inputs.gene_matrix, n_obs, n_vars)?;
    let spliced = load_cells_by_genes(SPLICED_LAYER, &inputs.spliced_matrix, n_obs, n_vars)?;
    let unspliced =
        load_cells_by_genes(UNSPLICED_LAYER, &inputs.unspliced_matrix, n_obs, n_vars)?;

    let FeatureTable {
        gene_ids,
        gene_names,
    } = features;

    let adata = SoloAnnData {
        obs_names,
        barcodes,
        var_names: gene_names,
        gene_ids,
        x,
        layers: vec![
            (SPLICED_LAYER.to_string(), spliced),
            (UNSPLICED_LAYER.to_string(), unspliced),
        ],
    };
    adata.validate_dimensions()?;
    Ok(adata)
}

/// Read a genes × cells matrix and return it transposed to cells × genes.
fn load_cells_by_genes(
    name: &str,
    path: &Path,
    n_obs: usize,
    n_vars: usize,
) -> Result<CsrMatrix<u32>> {
    info!("Loading {} counts from {:?}", name, path);
    let genes_by_cells = mtx::read_mtx(path)?;
    SparseOps::ensure_shape(name, &genes_by_cells, n_vars, n_obs)?;
    Ok(SparseOps::transpose_u32(&genes_by_cells))
}

/// Assemble the annotated matrix and write it to `config.output`.
pub fn make_h5ad(config: &H5adConfig) -> Result<SoloAnnData> {
    let adata = assemble(config)?;
    write_h5ad(&adata, &config.output)?;
    Ok(adata)
}
