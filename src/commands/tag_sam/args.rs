use solokit_lib::samtag::TagSamConfig;
use std::path::PathBuf;
use structopt::StructOpt;

/// Arguments for the `tag-sam` command.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "tag-sam",
    about = "Add STARSolo cell barcode and UMI tags after the RG:Z: field of SAM records"
)]
pub struct TagSamArgs {
    /// Input SAM file (`-` for stdin).
    #[structopt(short, long, parse(from_os_str))]
    pub input: PathBuf,

    /// Output SAM file (`-` for stdout).
    #[structopt(short, long, parse(from_os_str))]
    pub output: PathBuf,

    /// Cell barcode written to CR:Z: (and CB:Z: with a `-1` suffix).
    #[structopt(short, long)]
    pub barcode: String,

    /// Seed for UMI generation; omit for a fresh random stream.
    #[structopt(long)]
    pub seed: Option<u64>,
}

impl From<TagSamArgs> for TagSamConfig {
    fn from(args: TagSamArgs) -> TagSamConfig {
        TagSamConfig {
            input: args.input,
            output: args.output,
            barcode: args.barcode,
            seed: args.seed,
        }
    }
}
