mod args;

use anyhow::{Context, Result};
use log::info;
use solokit_lib::h5ad::{self, H5adConfig};
use std::time::Instant;

pub use args::MakeH5adArgs;

/// Entry point for the `make-h5ad` command.
pub fn run_make_h5ad(args: MakeH5adArgs) -> Result<()> {
    let start_time = Instant::now();
    let config: H5adConfig = args.into();

    info!("Building h5ad from STARSolo output {:?}", config.solo_dir);
    let adata = h5ad::make_h5ad(&config).with_context(|| {
        format!(
            "failed to build {:?} from {:?}",
            config.output, config.solo_dir
        )
    })?;

    info!(
        "make-h5ad finished in {:?}: {} cells × {} genes -> {:?}",
        start_time.elapsed(),
        adata.n_obs(),
        adata.n_vars(),
        config.output
    );
    Ok(())
}
