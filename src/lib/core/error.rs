//! Error types for the solokit library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoloError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("AnnData error: {0}")]
    AnnData(#[from] anyhow::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Sparse matrix error: {0}")]
    SparseMatrix(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, SoloError>;

impl From<nalgebra_sparse::SparseFormatError> for SoloError {
    fn from(err: nalgebra_sparse::SparseFormatError) -> Self {
        SoloError::SparseMatrix(format!("Sparse format error: {:?}", err))
    }
}
