mod args;

use anyhow::{Context, Result};
use solokit_lib::samtag::{self, TagSamConfig};

pub use args::TagSamArgs;

/// Entry point for the `tag-sam` command.
pub fn run_tag_sam(args: TagSamArgs) -> Result<()> {
    let config: TagSamConfig = args.into();
    samtag::tag_sam(&config)
        .with_context(|| format!("failed to tag {:?} into {:?}", config.input, config.output))?;
    Ok(())
}
