/// Core error types for Reshelf
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Reshelf
#[derive(Error, Debug)]
pub enum CoreError {
    /// A file's tag block could not be read
    #[error("Tag read error: {path}: {message}")]
    TagRead {
        /// File the read was attempted on
        path: PathBuf,
        /// Underlying failure description
        message: String,
    },

    /// A file's tag block could not be written
    #[error("Tag write error: {path}: {message}")]
    TagWrite {
        /// File the write was attempted on
        path: PathBuf,
        /// Underlying failure description
        message: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a tag read error
    pub fn tag_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TagRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a tag write error
    pub fn tag_write(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::TagWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
