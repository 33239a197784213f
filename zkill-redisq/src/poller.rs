//! Sync-first RedisQ poller
//!
//! Provides the [`Poller`] handle and its [`PollerBuilder`]. Polling happens on a
//! dedicated background thread started by [`PollerBuilder::build`]; there is no
//! separate start call.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use reqwest::blocking::Client;
use zkill_killmail::Kill;

use crate::config::{
    default_http_timeout, PollerConfig, DEFAULT_TIME_TO_WAIT, DEFAULT_USER_AGENT, REDISQ_URL,
    TIMEOUT_MARGIN,
};
use crate::error::{PollError, PollerError, Result};
use crate::iter::PollerIterator;
use crate::state::{PollerState, Shared};
use crate::worker::{spawn_poll_worker, WorkerChannels};

/// Builder for a [`Poller`]
///
/// # Example
///
/// ```rust,no_run
/// use zkill_redisq::PollerBuilder;
///
/// let poller = PollerBuilder::new()
///     .time_to_wait(5)
///     .queue_id("my-killboard")
///     .build()?;
/// # Ok::<(), zkill_redisq::PollerError>(())
/// ```
#[derive(Debug)]
pub struct PollerBuilder {
    endpoint: String,
    client: Option<Client>,
    time_to_wait: u32,
    queue_id: String,
    user_agent: String,
}

impl Default for PollerBuilder {
    fn default() -> Self {
        Self {
            endpoint: REDISQ_URL.to_string(),
            client: None,
            time_to_wait: DEFAULT_TIME_TO_WAIT,
            queue_id: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl PollerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Poll a different RedisQ-compatible endpoint instead of [`REDISQ_URL`]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured HTTP client (custom timeout, proxy, TLS)
    ///
    /// Its timeout must exceed the wait window, otherwise empty long-poll answers
    /// surface as network errors.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn time_to_wait(mut self, seconds: u32) -> Self {
        self.time_to_wait = seconds;
        self
    }

    pub fn queue_id(mut self, queue_id: impl Into<String>) -> Self {
        self.queue_id = queue_id.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Create the poller and start polling
    pub fn build(self) -> Result<Poller> {
        let (client, client_timeout) = match self.client {
            Some(client) => (client, None),
            None => {
                let timeout = default_http_timeout(self.time_to_wait);
                let client = Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(PollerError::ClientBuild)?;
                (client, Some(timeout))
            }
        };

        let config = PollerConfig::new(self.time_to_wait, self.queue_id, self.user_agent);
        let shared = Arc::new(Shared::new(self.endpoint, config));

        let (kill_tx, kills) = bounded(0);
        let (error_tx, errors) = bounded(0);
        let (shutdown_tx, shutdown_rx) = bounded(0);

        let worker = spawn_poll_worker(
            Arc::clone(&shared),
            client,
            WorkerChannels {
                kill_tx,
                error_tx,
                shutdown_rx,
            },
        )
        .map_err(PollerError::Spawn)?;

        Ok(Poller {
            kills,
            errors,
            shared,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(worker)),
            client_timeout,
        })
    }
}

/// Polls kills from zKillboard's RedisQ service
///
/// Kills and errors are handed over on two zero-capacity channels: the poller
/// blocks until the consumer receives each result, so both channels have to be
/// drained for as long as the poller runs. Null kills are dropped silently.
///
/// # Example
///
/// ```rust,no_run
/// use zkill_redisq::{Poller, PollEvent};
///
/// let poller = Poller::new()?;
///
/// for event in poller.iter() {
///     match event {
///         PollEvent::Kill(kill) => println!("Kill {}", kill.id()),
///         PollEvent::Error(error) => eprintln!("Error: {}", error),
///     }
/// }
/// # Ok::<(), zkill_redisq::PollerError>(())
/// ```
///
/// Configuration setters may be called while the poller runs; changes apply from
/// the next request on. Dropping the poller requests a stop without waiting.
pub struct Poller {
    kills: Receiver<Kill>,
    errors: Receiver<PollError>,
    shared: Arc<Shared>,
    /// Dropped on stop to wake a worker blocked on delivery
    shutdown_tx: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Timeout of the client built by the poller, `None` for caller-supplied clients
    client_timeout: Option<Duration>,
}

impl Poller {
    /// Create a poller for the public RedisQ service with default settings
    pub fn new() -> Result<Self> {
        PollerBuilder::new().build()
    }

    /// Create a poller using a preconfigured HTTP client
    pub fn with_client(client: Client) -> Result<Self> {
        PollerBuilder::new().client(client).build()
    }

    pub fn builder() -> PollerBuilder {
        PollerBuilder::new()
    }

    /// Receives every non-null kill
    pub fn kills(&self) -> &Receiver<Kill> {
        &self.kills
    }

    /// Receives every error encountered while retrieving or decoding kills
    pub fn errors(&self) -> &Receiver<PollError> {
        &self.errors
    }

    /// Blocking iterator over kills and errors
    pub fn iter(&self) -> PollerIterator {
        PollerIterator::new(self.kills.clone(), self.errors.clone())
    }

    /// Adjust the time RedisQ waits before answering with a null kill
    ///
    /// Takes effect with the next request; a request already in flight keeps its
    /// original value.
    pub fn set_time_to_wait(&self, seconds: u32) {
        self.shared
            .update_config(|config| config.time_to_wait = seconds);

        if let Some(timeout) = self.client_timeout {
            if Duration::from_secs(seconds.into()) + TIMEOUT_MARGIN > timeout {
                tracing::warn!(
                    "Time to wait of {}s leaves less than {:?} before the HTTP timeout of {:?}",
                    seconds,
                    TIMEOUT_MARGIN,
                    timeout
                );
            }
        }
    }

    /// Identify this client's queue to RedisQ; an empty string removes the parameter
    pub fn set_queue_id(&self, queue_id: impl Into<String>) {
        let queue_id = queue_id.into();
        self.shared.update_config(|config| config.queue_id = queue_id);
    }

    /// Replace the user agent sent with future requests
    pub fn set_user_agent(&self, user_agent: impl Into<String>) {
        let user_agent = user_agent.into();
        self.shared
            .update_config(|config| config.user_agent = user_agent);
    }

    /// Snapshot of the current configuration, including the prepared URL
    pub fn config(&self) -> PollerConfig {
        self.shared.config()
    }

    pub fn time_to_wait(&self) -> u32 {
        self.shared.config().time_to_wait
    }

    pub fn queue_id(&self) -> String {
        self.shared.config().queue_id
    }

    pub fn user_agent(&self) -> String {
        self.shared.config().user_agent
    }

    /// URL the next request will be sent to
    pub fn prepared_url(&self) -> String {
        self.shared.config().prepared_url().to_string()
    }

    /// Timeout of the client the poller built itself, if it did
    pub fn client_timeout(&self) -> Option<Duration> {
        self.client_timeout
    }

    pub fn state(&self) -> PollerState {
        self.shared.state()
    }

    /// Ask the poller to stop after the current iteration
    ///
    /// Does not block. An in-flight request is allowed to complete and its result
    /// still goes to a consumer already waiting for it; a result nobody is receiving
    /// is discarded. Calling this more than once is harmless.
    pub fn stop(&self) {
        self.shared.request_stop();
        if self.shutdown_tx.lock().take().is_some() {
            tracing::debug!("Stop requested");
        }
    }

    /// Block until the poll loop has exited and released its HTTP client
    ///
    /// May be called before or after [`Poller::stop`], and more than once.
    pub fn wait(&self) {
        self.shared.wait_stopped();

        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                tracing::error!("RedisQ poller thread panicked");
            }
        }
    }

    /// Stop the poller and wait for the poll loop to exit
    pub fn stop_and_wait(&self) {
        self.stop();
        self.wait();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = PollerBuilder::new();
        assert_eq!(builder.endpoint, REDISQ_URL);
        assert!(builder.client.is_none());
        assert_eq!(builder.time_to_wait, DEFAULT_TIME_TO_WAIT);
        assert!(builder.queue_id.is_empty());
        assert_eq!(builder.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_builder_setters() {
        let builder = PollerBuilder::new()
            .endpoint("http://127.0.0.1:1/listen.php")
            .time_to_wait(3)
            .queue_id("queue")
            .user_agent("tests");

        assert_eq!(builder.endpoint, "http://127.0.0.1:1/listen.php");
        assert_eq!(builder.time_to_wait, 3);
        assert_eq!(builder.queue_id, "queue");
        assert_eq!(builder.user_agent, "tests");
    }
}
