//! # Note Loader
//!
//! Discovers markdown notes under a directory tree and parses each into a
//! [`Note`]: body text plus the `title` and `tags` from its front matter.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Note Loader                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  LoaderConfig ──► NoteLoader ──► Note                           │
//! │                       │            ▲                            │
//! │                       ▼            │                            │
//! │                   WalkDir     front_matter                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod front_matter;
pub mod loader;
pub mod note;

pub use config::{LoaderConfig, NOTE_EXTENSION};
pub use error::{LoaderError, Result};
pub use front_matter::FrontMatterFormat;
pub use loader::NoteLoader;
pub use note::Note;
