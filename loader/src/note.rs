//! The parsed note type.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoaderError, Result};
use crate::front_matter::{self, Metadata};

/// One parsed note file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Path the note was loaded from; unique within a scan.
    pub path: PathBuf,

    /// Front-matter `title`, or the file name.
    pub title: String,

    /// Front-matter `tags`, in order.
    pub tags: Vec<String>,

    /// Body text with front matter removed.
    pub content: String,
}

impl Note {
    /// Parse a note from its path and raw text.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let split = front_matter::split(text);

        let metadata = match split.front_matter {
            Some((format, block)) => front_matter::parse_metadata(format, block).map_err(
                |reason| LoaderError::MalformedFrontMatter {
                    path: path.clone(),
                    reason,
                },
            )?,
            None => Metadata::default(),
        };

        let title = metadata
            .title
            .unwrap_or_else(|| default_title(&path));

        Ok(Self {
            title,
            tags: metadata.tags,
            content: split.body.to_string(),
            path,
        })
    }

    /// The path as a display string, as stored alongside the vector.
    pub fn path_string(&self) -> String {
        self.path.display().to_string()
    }
}

/// Base name of the file, extension included.
fn default_title(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_front_matter() {
        let note = Note::parse(
            "notes/a.md",
            "---\ntitle: Cooking\ntags: [food, quick]\n---\nPasta boils in 10 minutes.\n",
        )
        .unwrap();

        assert_eq!(
            note,
            Note {
                path: PathBuf::from("notes/a.md"),
                title: "Cooking".to_string(),
                tags: vec!["food".to_string(), "quick".to_string()],
                content: "Pasta boils in 10 minutes.".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_defaults() {
        let note = Note::parse("notes/sub/b.md", "Mount Rainier trail is 12 miles.").unwrap();
        assert_eq!(note.title, "b.md");
        assert!(note.tags.is_empty());
        assert_eq!(note.content, "Mount Rainier trail is 12 miles.");
    }

    #[test]
    fn test_parse_front_matter_without_title() {
        let note = Note::parse("c.md", "---\ntags: [x]\n---\nbody").unwrap();
        assert_eq!(note.title, "c.md");
        assert_eq!(note.tags, vec!["x".to_string()]);
    }

    #[test]
    fn test_parse_front_matter_with_integer_keys() {
        let note = Note::parse("x.md", "---\n0: Sneaky\n1: [a]\n---\nbody").unwrap();
        assert_eq!(note.title, "x.md");
        assert!(note.tags.is_empty());
        assert_eq!(note.content, "body");
    }

    #[test]
    fn test_parse_malformed_front_matter() {
        let err = Note::parse("bad.md", "---\ntitle: [oops\n---\nbody").unwrap_err();
        match err {
            LoaderError::MalformedFrontMatter { path, .. } => {
                assert_eq!(path, PathBuf::from("bad.md"));
            }
            other => panic!("expected MalformedFrontMatter, got {other:?}"),
        }
    }
}
