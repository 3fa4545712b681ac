//! core/mod.rs
//!
//! Everything that is not argument parsing:
//! - Discover candidate audio file paths (filesystem walk)
//! - Read/write tags (metadata IO)
//! - Talk to the outside world (cover lookups, yt-dlp)
//! - One module per tool under `tools/`, each returning a `RunReport`
//!
//! Every tool follows the same shape:
//!   (A) resolve targets -> Vec<PathBuf>   (fatal if the root is bad)
//!   (B) per file: read/derive -> one write -> Outcome   (never fatal)

pub mod artwork;
pub mod config;
pub mod download;
pub mod error;
pub mod library;
pub mod lookup;
pub mod probe;
pub mod tags;
pub mod tools;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::{Path, PathBuf};

use error::{Error, Result};

/// Discover MP3s under a single root folder.
///
/// The root must exist and be a directory; that is the one error that stops
/// a run before it starts.
pub fn scan_root(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotAFolder(root.to_path_buf()));
    }
    Ok(library::scan_mp3s(root, recursive))
}

/// A target may be one file or a folder of files.
pub fn resolve_targets(target: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_path_buf()]);
    }
    scan_root(target, recursive)
}
