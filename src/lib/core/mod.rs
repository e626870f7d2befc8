pub mod error;
pub mod errors;
pub mod fs;
pub mod io;
pub mod sparse;

pub mod prelude {
    pub use super::error::{Result, SoloError};
    pub use super::errors::is_broken_pipe;
    pub use super::fs::{is_gzipped, make_parent_dirs, resolve_input};
    pub use super::io::{get_reader, open_text_reader, open_text_writer};
    pub use super::sparse::SparseOps;
}
