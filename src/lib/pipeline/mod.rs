pub mod h5ad;
pub mod samtag;

pub mod prelude {
    pub use super::h5ad::{assemble, make_h5ad, write_h5ad, H5adConfig, SoloAnnData};
    pub use super::samtag::{create_rng, tag_sam, PatchStats, TagPatcher, TagSamConfig};
}
