//! core/error.rs
//! One error type for everything under `core`.
//!
//! Per-file problems are turned into `Outcome`s by the tools; only the
//! "can't even start" cases bubble all the way up to `main`.

use std::path::PathBuf;

use thiserror::Error;

use super::lookup::LookupError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("not a folder: {}", .0.display())]
    NotAFolder(PathBuf),

    #[error("not a readable audio file ({reason})")]
    NotAudio { path: PathBuf, reason: String },

    #[error("tag error: {source}")]
    Tag {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("downloader: {0}")]
    Download(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
