//! Error types for reciter-import
//!
//! Every variant is reported once at the top level and mapped to exit code 1.

use thiserror::Error;

/// Import pipeline error type
#[derive(Debug, Error)]
pub enum ImportError {
    /// Network or transport failure while fetching the page
    #[error("Error fetching page: {0}")]
    Fetch(String),

    /// The page contained no qualifying MP3 links
    #[error("No MP3 links found on the page")]
    ExtractionEmpty,

    /// No base URL could be derived from the extracted links
    #[error("Could not determine URL pattern: {0}")]
    PatternUndetermined(String),

    /// Writing progress output or reading the confirmation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry load/save or configuration error
    #[error(transparent)]
    Common(#[from] reciter_common::Error),
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
