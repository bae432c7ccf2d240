//! Error types for the engine

use reshelf_core::TagField;
use reshelf_metadata::MetadataError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `EngineError`
pub type Result<T> = std::result::Result<T, EngineError>;

/// Run-level engine errors.
///
/// Everything here is fatal for the run; per-file and per-action problems are
/// carried as data ([`reshelf_core::Outcome::Failed`], scan error lists)
/// instead, so one bad item never unwinds a batch.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Library root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Scan error: {0}")]
    Scan(MetadataError),

    #[error("Cannot build a usable {field} path component for {path}")]
    Unsanitizable { path: PathBuf, field: TagField },

    #[error("Report error: {0}")]
    Report(#[from] std::io::Error),
}

impl From<MetadataError> for EngineError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::RootNotFound(path) => EngineError::RootNotFound(path),
            MetadataError::NotADirectory(path) => EngineError::NotADirectory(path),
            other => EngineError::Scan(other),
        }
    }
}
