//! Configuration defaults and the mutable poller configuration.

use std::time::Duration;

use crate::error::PollError;
use crate::endpoint::build_url;

/// Version of the zkill-redisq library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every request unless replaced via `set_user_agent`
pub const DEFAULT_USER_AGENT: &str = concat!("zkill-redisq v", env!("CARGO_PKG_VERSION"));

/// URL of zKillboard's RedisQ service
pub const REDISQ_URL: &str = "https://redisq.zkillboard.com/listen.php";

/// Seconds RedisQ holds a request before answering with a null kill
/// Default: 10 seconds
pub const DEFAULT_TIME_TO_WAIT: u32 = 10;

/// Extra time granted on top of the wait window to absorb latency
/// Default: 2 seconds
pub const TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

/// Timeout of the HTTP client built when none is supplied
/// Default: 12 seconds
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(12);

/// Timeout for a default client polling with the given wait window.
///
/// Never shorter than [`DEFAULT_HTTP_TIMEOUT`] and always longer than the wait
/// window by at least [`TIMEOUT_MARGIN`], so an empty long-poll answer is not
/// mistaken for a timeout.
pub fn default_http_timeout(time_to_wait: u32) -> Duration {
    (Duration::from_secs(time_to_wait.into()) + TIMEOUT_MARGIN).max(DEFAULT_HTTP_TIMEOUT)
}

/// Mutable poller configuration
///
/// `prepared_url` is derived from the other fields and rebuilt by
/// [`PollerConfig::rebuild_url`] whenever one of them changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    /// How long RedisQ should wait before returning a null kill
    pub time_to_wait: u32,
    /// Identifies the client's queue to RedisQ (empty: none)
    pub queue_id: String,
    /// User agent sent with requests
    pub user_agent: String,
    prepared_url: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            time_to_wait: DEFAULT_TIME_TO_WAIT,
            queue_id: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            prepared_url: String::new(),
        }
    }
}

impl PollerConfig {
    /// Configuration with the given parameters and no URL prepared yet
    pub fn new(
        time_to_wait: u32,
        queue_id: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            time_to_wait,
            queue_id: queue_id.into(),
            user_agent: user_agent.into(),
            prepared_url: String::new(),
        }
    }

    /// URL the next request will be sent to
    pub fn prepared_url(&self) -> &str {
        &self.prepared_url
    }

    /// Rebuild the prepared URL from the current parameters.
    ///
    /// If `endpoint` cannot be parsed the unmodified endpoint is used instead and
    /// the parse failure is returned for reporting.
    pub(crate) fn rebuild_url(&mut self, endpoint: &str) -> Option<PollError> {
        match build_url(endpoint, self.time_to_wait, &self.queue_id) {
            Ok(url) => {
                self.prepared_url = url;
                None
            }
            Err(error) => {
                tracing::warn!("Falling back to unmodified endpoint: {}", error);
                self.prepared_url = endpoint.to_string();
                Some(error)
            }
        }
    }
}
