//! Error types for worker debugging.

use thiserror::Error;

/// Errors that can occur while resolving debug data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DebugError {
    /// The start-time marker could not be read as a timestamp.
    #[error("Invalid start-time marker: {0:?}")]
    InvalidMarker(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
