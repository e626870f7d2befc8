//! solokit - STARSolo companion utilities
//!
//! # Tools
//!
//! - `make-h5ad`: Combine STARSolo Gene and Velocyto matrices into one h5ad file
//! - `tag-sam`: Add cell barcode and UMI tags to SAM records for STARSolo input
//!
//! # Usage
//!
//! ```bash
//! # Build an AnnData file with spliced/unspliced layers
//! solokit make-h5ad --solo-indir sample/Solo.out --cell-barcodes-csv cells.csv --h5ad sample.h5ad
//!
//! # Tag one plate well's alignments with its barcode
//! solokit tag-sam --input well_A1.sam --output well_A1.tagged.sam --barcode ACGTACGT
//! ```

extern crate solokit_lib;
pub mod commands;
use anyhow::Result;
use env_logger::Env;
use log::*;
use solokit_lib::utils;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// STARSolo companion utilities
struct Args {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case")]
enum Subcommand {
    /// Make an h5ad from STARSolo count matrices
    #[structopt(name = "make-h5ad")]
    MakeH5ad(commands::MakeH5adArgs),
    /// Add cell barcode and UMI tags to SAM records
    #[structopt(name = "tag-sam")]
    TagSam(commands::TagSamArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::MakeH5ad(args) => commands::run_make_h5ad(args)?,
            Subcommand::TagSam(args) => commands::run_tag_sam(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = Args::from_args().subcommand.run() {
        if utils::is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
