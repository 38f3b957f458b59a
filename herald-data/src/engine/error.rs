//! Failures raised while refreshing or resetting a source.

use std::io;

use camino::Utf8PathBuf;
use herald_core::{PathError, ShapeError, error_reply, not_found_reply};
use herald_fs::BaseDirError;
use thiserror::Error;

/// Errors raised by [`RefreshEngine`](super::RefreshEngine) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The source file does not exist.
    #[error("JSON not found: {file}")]
    NotFound {
        /// File name as registered.
        file: String,
    },
    /// The source file resolves outside the base directory.
    #[error(transparent)]
    Containment(#[from] BaseDirError),
    /// The source path exists but is not a regular file.
    #[error("{path} is not a regular file")]
    NotAFile {
        /// Resolved path.
        path: Utf8PathBuf,
    },
    /// Inspecting the source path failed.
    #[error("failed to inspect {path}: {source}")]
    Inspect {
        /// Resolved path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// Reading the document failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Resolved path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
    /// The document is not valid JSON.
    #[error("failed to parse JSON in {path}: {source}")]
    Parse {
        /// Resolved path.
        path: Utf8PathBuf,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The dot path does not resolve inside the document.
    #[error("{dot_path}: {source}")]
    Path {
        /// Dot path as registered.
        dot_path: String,
        /// Resolution failure.
        #[source]
        source: PathError,
    },
    /// The target is neither a sequence nor a mapping.
    #[error(transparent)]
    Shape(#[from] ShapeError),
    /// Serialising the document or the reply failed.
    #[error("failed to serialise JSON: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing the document back failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Resolved path.
        path: Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    /// Whether the failure is a refusal to touch a path outside the base
    /// directory.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Containment(BaseDirError::Escapes { .. }))
    }

    /// Render the failure as a `[ERR]` reply for the named source.
    #[must_use]
    pub fn reply(&self, name: &str) -> String {
        match self {
            Self::NotFound { file } => not_found_reply(file),
            other => error_reply(name, other),
        }
    }
}
