//! Error types for matching operations

use thiserror::Error;

use crate::domain::Classification;

/// Errors that can occur while building documents or running a match.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A nearest-neighbor lookup received a token with no tolerance-window rule
    #[error("data type not supported for nearest-neighbor matching: {kind} in {classification}")]
    UnsupportedType {
        kind: &'static str,
        classification: Classification,
    },

    /// A builder or configuration knob is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed dictionary resource line
    #[error("dictionary line {line}: {message}")]
    Dictionary { line: usize, message: String },

    /// IO error while reading a dictionary resource
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for matching operations
pub type Result<T> = std::result::Result<T, MatchError>;
