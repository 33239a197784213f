//! State shared between the poller handle and its worker thread.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex, RwLock};

use crate::config::PollerConfig;
use crate::error::PollError;

/// Lifecycle of a poller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    /// The loop is polling RedisQ
    Running,
    /// Stop was requested; the loop exits at its next iteration boundary
    StopRequested,
    /// The loop has exited and released its HTTP client
    Stopped,
}

/// Snapshot of what the next request needs
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub url: String,
    pub user_agent: String,
}

pub(crate) struct Shared {
    endpoint: String,
    config: RwLock<PollerConfig>,
    /// URL errors raised outside the loop, reported by the loop on its next iteration
    pending_error: Mutex<Option<PollError>>,
    stop_requested: AtomicBool,
    stopped: Mutex<bool>,
    stopped_cv: Condvar,
}

impl Shared {
    pub fn new(endpoint: String, mut config: PollerConfig) -> Self {
        let pending_error = config.rebuild_url(&endpoint);

        Self {
            endpoint,
            config: RwLock::new(config),
            pending_error: Mutex::new(pending_error),
            stop_requested: AtomicBool::new(false),
            stopped: Mutex::new(false),
            stopped_cv: Condvar::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> PollerConfig {
        self.config.read().clone()
    }

    /// Apply `update` and rebuild the prepared URL before releasing the lock.
    pub fn update_config<F>(&self, update: F)
    where
        F: FnOnce(&mut PollerConfig),
    {
        let error = {
            let mut config = self.config.write();
            update(&mut config);
            config.rebuild_url(&self.endpoint)
        };

        if let Some(error) = error {
            *self.pending_error.lock() = Some(error);
        }
    }

    pub fn request(&self) -> Request {
        let config = self.config.read();
        Request {
            url: config.prepared_url().to_string(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn take_pending_error(&self) -> Option<PollError> {
        self.pending_error.lock().take()
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Release everyone blocked in [`Shared::wait_stopped`]
    pub fn mark_stopped(&self) {
        let mut stopped = self.stopped.lock();
        *stopped = true;
        self.stopped_cv.notify_all();
    }

    pub fn wait_stopped(&self) {
        let mut stopped = self.stopped.lock();
        while !*stopped {
            self.stopped_cv.wait(&mut stopped);
        }
    }

    pub fn state(&self) -> PollerState {
        if *self.stopped.lock() {
            PollerState::Stopped
        } else if self.stop_requested() {
            PollerState::StopRequested
        } else {
            PollerState::Running
        }
    }
}
