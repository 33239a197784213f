//! Background worker thread running the poll loop
//!
//! The worker owns the HTTP client and the sending halves of the kill and error
//! channels. Both channels are zero-capacity, so every hand-off blocks until the
//! consumer takes it; the loop never issues the next request before the previous
//! result was received.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{select, Receiver, Sender, TrySendError};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use zkill_killmail::Kill;

use crate::error::PollError;
use crate::state::{Request, Shared};

/// Channel ends owned by the worker
pub(crate) struct WorkerChannels {
    pub kill_tx: Sender<Kill>,
    pub error_tx: Sender<PollError>,
    /// Disconnects when stop is requested
    pub shutdown_rx: Receiver<()>,
}

/// Outcome of handing a result to the consumer
#[derive(Debug, PartialEq, Eq)]
enum Delivery {
    Delivered,
    /// Stop was requested while waiting for the consumer
    Shutdown,
    /// All receivers are gone
    Disconnected,
}

impl WorkerChannels {
    /// Hand `message` to the consumer.
    ///
    /// A consumer already blocked on the channel always gets the message, even after
    /// stop was requested. Only a message nobody is waiting for is dropped on stop.
    fn deliver<T>(&self, tx: &Sender<T>, message: T) -> Delivery {
        let message = match tx.try_send(message) {
            Ok(()) => return Delivery::Delivered,
            Err(TrySendError::Disconnected(_)) => return Delivery::Disconnected,
            Err(TrySendError::Full(message)) => message,
        };

        select! {
            send(tx, message) -> result => match result {
                Ok(()) => Delivery::Delivered,
                Err(_) => Delivery::Disconnected,
            },
            recv(self.shutdown_rx) -> _ => Delivery::Shutdown,
        }
    }
}

/// Marks the poller stopped when dropped, even if the loop panicked.
struct StoppedGuard<'a>(&'a Shared);

impl Drop for StoppedGuard<'_> {
    fn drop(&mut self) {
        self.0.mark_stopped();
    }
}

/// Spawns the background poll worker thread
pub(crate) fn spawn_poll_worker(
    shared: Arc<Shared>,
    client: Client,
    channels: WorkerChannels,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("zkill-redisq-poller".to_string())
        .spawn(move || {
            let _stopped = StoppedGuard(&shared);
            run_poll_loop(&shared, client, channels);
        })
}

/// Main poll loop; returns once stop was requested or the receivers were dropped.
///
/// Client and channel senders are dropped on return, before the caller's
/// `StoppedGuard` releases waiters.
fn run_poll_loop(shared: &Shared, client: Client, channels: WorkerChannels) {
    tracing::info!("RedisQ poller started for {}", shared.endpoint());

    while !shared.stop_requested() {
        let delivery = if let Some(error) = shared.take_pending_error() {
            channels.deliver(&channels.error_tx, error)
        } else {
            let request = shared.request();
            match retrieve_kill(&client, &request) {
                Ok(kill) if kill.is_null_kill() => {
                    tracing::trace!("Discarding null kill");
                    continue;
                }
                Ok(kill) => {
                    tracing::debug!("Received kill {}", kill.id());
                    channels.deliver(&channels.kill_tx, kill)
                }
                Err(error) => {
                    tracing::debug!("Poll of {} failed: {}", request.url, error);
                    channels.deliver(&channels.error_tx, error)
                }
            }
        };

        match delivery {
            Delivery::Delivered => {}
            Delivery::Shutdown => {
                tracing::debug!("Stop requested while waiting for consumer");
                break;
            }
            Delivery::Disconnected => {
                tracing::debug!("Receivers dropped, shutting down poller");
                break;
            }
        }
    }

    tracing::info!("RedisQ poller stopped");
}

/// Fetch one response from RedisQ and decode it into a kill
fn retrieve_kill(client: &Client, request: &Request) -> Result<Kill, PollError> {
    let response = client
        .get(&request.url)
        .header(USER_AGENT, &request.user_agent)
        .header(ACCEPT, "application/json")
        .send()
        .map_err(PollError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PollError::Status { status });
    }

    let body = response.bytes().map_err(PollError::Network)?;

    zkill_killmail::decode(&body)?.ok_or(PollError::NullResponse)
}
