//! Persistence of the author mapping.
//!
//! The mapping is produced by `sync` and consumed by later `notify` runs, with
//! the file on disk as the only hand-off between them.

pub mod mapping_file;

pub use mapping_file::{MappingFileError, load_mapping, save_mapping_atomic};
