//! Optional `tracing` subscriber for applications embedding the poller.
//!
//! The library only emits events; nothing is printed unless a subscriber is
//! installed, either by the application or through [`init_from_env`].

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directives for the poller, e.g. `zkill_redisq=debug`. Unset means no output.
pub const LOG_ENV: &str = "ZKILL_LOG";

/// Set to `json` for one JSON object per event instead of plain text.
pub const LOG_FORMAT_ENV: &str = "ZKILL_LOG_FORMAT";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid ZKILL_LOG directives {directives:?}: {source}")]
    Filter {
        directives: String,
        source: ParseError,
    },

    #[error("A global tracing subscriber is already installed")]
    AlreadySet,
}

/// Parse filter directives, rejecting ones `EnvFilter` would silently ignore
pub fn filter_from(directives: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(directives).map_err(|source| LoggingError::Filter {
        directives: directives.to_string(),
        source,
    })
}

/// Install a stderr subscriber when [`LOG_ENV`] is set.
///
/// Returns `Ok(false)` when the variable is unset or empty and nothing was installed.
pub fn init_from_env() -> Result<bool, LoggingError> {
    let directives = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.trim().is_empty() => directives,
        _ => return Ok(false),
    };
    let filter = filter_from(&directives)?;
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.compact().with_thread_names(true).try_init()
    };
    installed.map_err(|_| LoggingError::AlreadySet)?;

    Ok(true)
}
