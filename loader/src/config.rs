//! Configuration for note discovery.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension, without the dot, that marks a file as a note.
pub const NOTE_EXTENSION: &str = "md";

/// Configuration for a notes directory scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Root of the notes tree.
    pub root: PathBuf,

    /// Whether to descend into and load dot-prefixed entries.
    pub include_hidden: bool,

    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,

    /// Maximum depth to recurse (None = unlimited).
    pub max_depth: Option<usize>,
}

impl LoaderConfig {
    /// Create a config for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Also load hidden files and directories.
    pub fn include_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    /// Set the maximum depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether a path names a note file by extension.
    pub fn is_note_path(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include_hidden: false,
            follow_symlinks: false,
            max_depth: None,
        }
    }
}
