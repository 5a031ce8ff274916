//! Error types for program search

use thiserror::Error;

/// Errors raised by the search core and its collaborators
#[derive(Debug, Error)]
pub enum SearchError {
    /// A configuration value is out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong
        message: String,
    },

    /// The program generator could not produce source text
    #[error("Program generation failed: {reason}")]
    Generator {
        /// Failure description
        reason: String,
    },

    /// The execution sandbox could not run a candidate
    #[error("Execution failed: {reason}")]
    Execution {
        /// Failure description
        reason: String,
    },

    /// The improvement oracle failed or returned nothing usable
    #[error("Code improvement failed: {reason}")]
    Improvement {
        /// Failure description
        reason: String,
    },

    /// No stored artifact matches the selector
    #[error("Artifact not found: {selector}")]
    ArtifactNotFound {
        /// Rendered selector
        selector: String,
    },

    /// Filesystem or process I/O failure
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Result alias used across the crate
pub type SearchResult<T> = Result<T, SearchError>;

impl SearchError {
    /// Shorthand for an [`SearchError::InvalidConfiguration`]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        SearchError::InvalidConfiguration {
            message: message.into(),
        }
    }
}
