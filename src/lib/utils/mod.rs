//! Flat re-exports of the helpers in `crate::core` used by the command layer.

pub use crate::core::errors::is_broken_pipe;
pub use crate::core::fs::{is_gzipped, make_parent_dirs, resolve_input};
pub use crate::core::io::{get_reader, open_text_reader, open_text_writer};
