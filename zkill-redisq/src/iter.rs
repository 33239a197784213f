//! Sync iterator for consuming kills and errors from a Poller
//!
//! Merges the poller's two channels into one blocking iterator so consumers do
//! not have to select over both themselves.

use std::time::Duration;

use crossbeam::channel::{select, Receiver};
use zkill_killmail::Kill;

use crate::error::PollError;

/// A single result handed over by the poller
#[derive(Debug)]
pub enum PollEvent {
    /// A non-null kill
    Kill(Box<Kill>),
    /// A failed poll iteration
    Error(PollError),
}

/// Blocking iterator over poll results
///
/// `next()` blocks until a kill or error arrives and returns `None` once the
/// poller has stopped and both channels are disconnected.
pub struct PollerIterator {
    kills: Receiver<Kill>,
    errors: Receiver<PollError>,
}

impl PollerIterator {
    pub(crate) fn new(kills: Receiver<Kill>, errors: Receiver<PollError>) -> Self {
        Self { kills, errors }
    }

    /// Block until a result is available
    ///
    /// Returns `None` if the poller has stopped.
    pub fn recv(&self) -> Option<PollEvent> {
        select! {
            recv(self.kills) -> kill => kill.ok().map(|k| PollEvent::Kill(Box::new(k))),
            recv(self.errors) -> error => error.ok().map(PollEvent::Error),
        }
    }

    /// Take a result the poller is currently offering, without blocking
    pub fn try_recv(&self) -> Option<PollEvent> {
        if let Ok(kill) = self.kills.try_recv() {
            return Some(PollEvent::Kill(Box::new(kill)));
        }
        self.errors.try_recv().ok().map(PollEvent::Error)
    }

    /// Block until a result is available or timeout expires
    ///
    /// Returns `None` if the timeout expires or the poller has stopped.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PollEvent> {
        select! {
            recv(self.kills) -> kill => kill.ok().map(|k| PollEvent::Kill(Box::new(k))),
            recv(self.errors) -> error => error.ok().map(PollEvent::Error),
            default(timeout) => None,
        }
    }

    /// Get a non-blocking iterator over currently offered results
    pub fn try_iter(&self) -> TryIterator<'_> {
        TryIterator { inner: self }
    }

    /// Get a blocking iterator with timeout
    ///
    /// Blocks for up to `timeout` on each call to `next()`.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIterator<'_> {
        TimeoutIterator {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for PollerIterator {
    type Item = PollEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Clone for PollerIterator {
    fn clone(&self) -> Self {
        Self {
            kills: self.kills.clone(),
            errors: self.errors.clone(),
        }
    }
}

/// Non-blocking iterator over currently offered results
pub struct TryIterator<'a> {
    inner: &'a PollerIterator,
}

impl<'a> Iterator for TryIterator<'a> {
    type Item = PollEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with timeout
pub struct TimeoutIterator<'a> {
    inner: &'a PollerIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIterator<'a> {
    type Item = PollEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::bounded;
    use std::thread;

    #[test]
    fn test_try_recv_empty() {
        let (_kill_tx, kills) = bounded::<Kill>(0);
        let (_error_tx, errors) = bounded::<PollError>(0);
        let iter = PollerIterator::new(kills, errors);

        assert!(iter.try_recv().is_none());
        assert_eq!(iter.try_iter().count(), 0);
    }

    #[test]
    fn test_recv_timeout_empty() {
        let (_kill_tx, kills) = bounded::<Kill>(0);
        let (_error_tx, errors) = bounded::<PollError>(0);
        let iter = PollerIterator::new(kills, errors);

        let start = std::time::Instant::now();
        assert!(iter.recv_timeout(Duration::from_millis(50)).is_none());
        assert!(start.elapsed() >= Duration::from_millis(45));
    }

    #[test]
    fn test_recv_merges_channels() {
        let (kill_tx, kills) = bounded::<Kill>(0);
        let (error_tx, errors) = bounded::<PollError>(0);
        let iter = PollerIterator::new(kills, errors);

        let producer = thread::spawn(move || {
            error_tx.send(PollError::NullResponse).unwrap();
            kill_tx.send(Kill::default()).unwrap();
        });

        assert!(matches!(iter.recv(), Some(PollEvent::Error(PollError::NullResponse))));
        assert!(matches!(iter.recv(), Some(PollEvent::Kill(_))));

        producer.join().unwrap();
        // Senders dropped with the producer
        assert!(iter.recv().is_none());
    }

    #[test]
    fn test_iterator_ends_when_disconnected() {
        let (kill_tx, kills) = bounded::<Kill>(0);
        let (error_tx, errors) = bounded::<PollError>(0);
        drop(kill_tx);
        drop(error_tx);

        let iter = PollerIterator::new(kills, errors);
        assert_eq!(iter.clone().count(), 0);
        assert!(iter.recv_timeout(Duration::from_secs(1)).is_none());
    }
}
