//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while reading, parsing, or rendering posts
#[derive(Debug, Error)]
pub enum ContentError {
    /// No source file matches the requested slug
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    /// Front-matter or document structure could not be read
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Markdown to HTML conversion failed
    #[error("failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    /// The content directory could not be created
    #[error("failed to initialize content store at {}: {source}", .path.display())]
    StoreInit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the store or a source file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::NotFound { slug: slug.into() }
    }

    /// True when the error means "no such post" rather than a broken one
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
