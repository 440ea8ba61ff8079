//! Common error types for the reciter catalog

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the reciter tools
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Existing registry file is not a valid JSON array of entries
    #[error("Error parsing JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Registry could not be serialized or written
    #[error("Error saving file {}: {reason}", path.display())]
    Save { path: PathBuf, reason: String },
}
