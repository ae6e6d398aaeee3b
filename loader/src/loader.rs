//! Note discovery and loading.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tokio::fs;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::note::Note;

/// Finds and parses the notes under a root directory.
pub struct NoteLoader {
    config: LoaderConfig,
}

impl NoteLoader {
    /// Create a loader for the given configuration.
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Create a loader with default options for `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self::new(LoaderConfig::new(root))
    }

    /// The loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.file_name().to_string_lossy().starts_with('.')
    }

    /// List every note file under the root, sorted by path.
    ///
    /// Any walk error (unreadable directory, symlink loop) fails the scan.
    pub fn find_note_files(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.root;
        if !root.is_dir() {
            return Err(LoaderError::RootNotFound(root.clone()));
        }

        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || include_hidden || !Self::is_hidden(e));

        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && LoaderConfig::is_note_path(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        debug!("Found {} note files under {}", paths.len(), root.display());
        Ok(paths)
    }

    /// Read and parse a single note.
    pub async fn load_note(&self, path: &Path) -> Result<Note> {
        let bytes = fs::read(path).await.map_err(|source| LoaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| LoaderError::NotUtf8(path.to_path_buf()))?;

        let note = Note::parse(path, &text)?;
        debug!("Loaded note {} ({:?})", path.display(), note.title);
        Ok(note)
    }

    /// Find, read and parse every note. The first failure aborts the pass.
    pub async fn load_all(&self) -> Result<Vec<Note>> {
        let start = Instant::now();
        let paths = self.find_note_files()?;

        let mut notes = Vec::with_capacity(paths.len());
        for path in &paths {
            notes.push(self.load_note(path).await?);
        }

        info!(
            "Loaded {} notes from {} in {:?}",
            notes.len(),
            self.config.root.display(),
            start.elapsed()
        );
        Ok(notes)
    }
}
