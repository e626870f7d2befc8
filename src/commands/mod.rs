pub mod make_h5ad;
pub mod tag_sam;

pub use make_h5ad::{run_make_h5ad, MakeH5adArgs};
pub use tag_sam::{run_tag_sam, TagSamArgs};
