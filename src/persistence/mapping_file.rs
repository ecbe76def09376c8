//! Author mapping file persistence.
//!
//! The mapping is stored as a pretty-printed JSON array of
//! `{ "path", "authorLinks" }` objects, normally at
//! `assets/author_mapping.json`.
//!
//! # Atomic Writes
//!
//! The file is written using a write-to-temp-then-rename pattern:
//! 1. Write to `<path>.tmp`
//! 2. fsync the file
//! 3. Rename to `<path>`
//! 4. fsync the directory
//!
//! A notify run reading the mapping therefore always sees either the previous
//! or the new mapping, never a partial write.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::types::AuthorMapping;

/// Errors that can occur while reading or writing the mapping file.
#[derive(Debug, Error)]
pub enum MappingFileError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for mapping file operations.
pub type Result<T> = std::result::Result<T, MappingFileError>;

/// Saves the mapping atomically, creating parent directories as needed.
pub fn save_mapping_atomic(path: &Path, mapping: &AuthorMapping) -> Result<()> {
    if let Some(parent) = nonempty_parent(path) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(mapping)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)?;

    if let Some(parent) = nonempty_parent(path) {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// Loads the mapping from disk.
pub fn load_mapping(path: &Path) -> Result<AuthorMapping> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Syncs a directory so a rename inside it survives a crash.
fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    File::open(dir_path)?.sync_all()
}

/// `Path::parent` returns `Some("")` for bare file names.
fn nonempty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
