/// Metadata-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Library root does not exist; fatal for the whole run
    #[error("Library root not found: {0}")]
    RootNotFound(PathBuf),

    /// Library root is not a directory; fatal for the whole run
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The file carries no tag block at all
    #[error("No tags in file: {0}")]
    NoTags(PathBuf),

    /// Tag parsing error
    #[error("Tag parsing error: {0}")]
    Parse(String),

    /// Tag writing error
    #[error("Tag writing error: {0}")]
    Write(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}
