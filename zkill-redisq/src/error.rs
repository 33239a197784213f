//! Error types for the zkill-redisq crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single poll iteration, delivered on the error channel.
///
/// None of these stop the poller; the next iteration is the retry.
#[derive(Error, Debug)]
pub enum PollError {
    /// Building or sending the request failed, or the body could not be read
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// RedisQ answered with a non-success status
    #[error("Unexpected HTTP status: {status}")]
    Status { status: StatusCode },

    /// The response body was not a valid kill package
    #[error("Failed to decode kill: {0}")]
    Decode(#[from] zkill_killmail::KillmailError),

    /// The response body decoded to nothing at all
    #[error("RedisQ returned a null document")]
    NullResponse,

    /// The configured endpoint is not a valid URL; requests fall back to it verbatim
    #[error("Failed to parse URL {endpoint:?}: {source}")]
    Url {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },
}

impl PollError {
    /// HTTP status of a `Status` error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PollError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors that prevent a poller from being created.
#[derive(Error, Debug)]
pub enum PollerError {
    /// The default HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The background poll thread could not be spawned
    #[error("Failed to spawn poller thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Result type for poller construction
pub type Result<T> = std::result::Result<T, PollerError>;
