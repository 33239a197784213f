//! Error types for killmail decoding.

use thiserror::Error;

/// Errors that can occur while decoding killmail data
#[derive(Error, Debug)]
pub enum KillmailError {
    /// The JSON document could not be decoded into a kill
    #[error("Failed to decode kill JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp did not match the RedisQ layout
    #[error("Invalid kill time {value:?}: {source}")]
    Time {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Result type for killmail operations
pub type Result<T> = std::result::Result<T, KillmailError>;
