use solokit_lib::h5ad::H5adConfig;
use std::path::PathBuf;
use structopt::StructOpt;

/// Arguments for the `make-h5ad` command.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "make-h5ad",
    about = "Make an h5ad from STARSolo count matrices"
)]
pub struct MakeH5adArgs {
    /// STARSolo `Solo.out` directory containing `Gene/filtered` and `Velocyto/filtered`.
    #[structopt(long = "solo-indir", parse(from_os_str))]
    pub solo_indir: PathBuf,

    /// CSV linking cell barcodes to cell identifiers (`barcode` and `cell_id` columns).
    #[structopt(long = "cell-barcodes-csv", parse(from_os_str))]
    pub cell_barcodes_csv: PathBuf,

    /// Output path for the `.h5ad` file.
    #[structopt(long, parse(from_os_str))]
    pub h5ad: PathBuf,
}

impl From<MakeH5adArgs> for H5adConfig {
    fn from(args: MakeH5adArgs) -> H5adConfig {
        H5adConfig {
            solo_dir: args.solo_indir,
            cell_barcodes_csv: args.cell_barcodes_csv,
            output: args.h5ad,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_arguments() {
        let args = MakeH5adArgs::from_iter_safe(&[
            "make-h5ad",
            "--solo-indir",
            "sample/Solo.out",
            "--cell-barcodes-csv",
            "cells.csv",
            "--h5ad",
            "out/sample.h5ad",
        ])
        .unwrap();

        let config: H5adConfig = args.into();
        assert_eq!(config.solo_dir, PathBuf::from("sample/Solo.out"));
        assert_eq!(config.cell_barcodes_csv, PathBuf::from("cells.csv"));
        assert_eq!(config.output, PathBuf::from("out/sample.h5ad"));
    }

    #[test]
    fn all_arguments_are_required() {
        assert!(MakeH5adArgs::from_iter_safe(&[
            "make-h5ad",
            "--solo-indir",
            "Solo.out",
            "--h5ad",
            "out.h5ad",
        ])
        .is_err());
    }
}
