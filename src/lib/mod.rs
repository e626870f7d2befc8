//! solokit: STARSolo companion utilities
//!
//! The library provides functionality for:
//! 1. Assembling STARSolo Gene and Velocyto count matrices into a single h5ad file
//! 2. Tagging text SAM records with the cell barcode and UMI fields STARSolo expects
//!
//! # Modules
//!
//! - [`core`]: errors, file helpers, readers/writers and sparse matrix utilities
//! - [`pipeline`]: the `h5ad` assembler and the `samtag` patcher
//! - [`utils`]: flat re-exports of frequently used helpers

pub mod core;
pub mod pipeline;
pub mod utils;

pub use pipeline::{h5ad, samtag};
