//! # zkill-redisq
//!
//! A lightweight, sync-first library for receiving killmails from zKillboard's
//! RedisQ service in realtime.
//!
//! ## Overview
//!
//! RedisQ is a long-poll endpoint: each request is held open until a kill is
//! available or the wait window (`ttw`) expires, in which case an empty "null"
//! kill is returned. A [`Poller`] runs this request loop on a background thread,
//! drops null kills and hands everything else to the application on two channels,
//! one for kills and one for errors.
//!
//! Both channels are zero-capacity. The loop does not issue its next request
//! until the previous result has been received, so the application must keep
//! draining both channels for as long as the poller runs.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use crossbeam::channel::select;
//! use zkill_redisq::Poller;
//!
//! let poller = Poller::new()?;
//! poller.set_time_to_wait(5);
//!
//! loop {
//!     select! {
//!         recv(poller.kills()) -> kill => match kill {
//!             Ok(kill) => println!("Kill {} worth {}", kill.id(), kill.zkb().total_value),
//!             Err(_) => break,
//!         },
//!         recv(poller.errors()) -> error => match error {
//!             Ok(error) => eprintln!("Error: {}", error),
//!             Err(_) => break,
//!         },
//!     }
//! }
//! # Ok::<(), zkill_redisq::PollerError>(())
//! ```
//!
//! Errors never stop the loop; a failing endpoint produces one error per
//! iteration until [`Poller::stop`] is called.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod iter;
pub mod logging;
pub mod poller;
mod state;
mod worker;

pub use config::{PollerConfig, DEFAULT_USER_AGENT, REDISQ_URL, VERSION};
pub use error::{PollError, PollerError, Result};
pub use iter::{PollEvent, PollerIterator};
pub use poller::{Poller, PollerBuilder};
pub use state::PollerState;

pub use zkill_killmail::{self as killmail, Kill};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Kill, PollError, PollEvent, Poller, PollerBuilder, PollerError, PollerIterator,
        PollerState, Result,
    };
}
