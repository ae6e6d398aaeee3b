//! Error types for the note loader.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while discovering or parsing notes.
///
/// Every variant aborts the whole loading pass.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The notes root does not exist or is not a directory.
    #[error("notes directory not found: {0}")]
    RootNotFound(PathBuf),

    /// Walking the directory tree failed.
    #[error("failed to walk notes directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// A note could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A note is not valid UTF-8.
    #[error("{0} is not valid UTF-8 text")]
    NotUtf8(PathBuf),

    /// A note's front matter could not be parsed.
    #[error("malformed front matter in {path}: {reason}")]
    MalformedFrontMatter { path: PathBuf, reason: String },
}
