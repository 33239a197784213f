//! # zkill-killmail
//!
//! Data types for killmails as delivered by zKillboard's RedisQ service, plus the
//! JSON decoding helpers used by the poller.
//!
//! RedisQ wraps every kill in a `package` envelope. When no kill became available
//! during the server-side wait window, the envelope is `null` (or carries a zero
//! `killID`); such a "null kill" decodes successfully and is detected through
//! [`Kill::is_null_kill`].
//!
//! ```rust
//! use zkill_killmail::decode_str;
//!
//! let kill = decode_str(r#"{"package":null}"#).unwrap().unwrap();
//! assert!(kill.is_null_kill());
//! ```

mod error;
mod kill;
pub mod time;

pub use error::{KillmailError, Result};
pub use kill::{
    Attacker, CommonAttributes, Icon, Item, Kill, KillMail, KillPackage, Position, Victim, War,
    ZKillboardAttributes,
};
pub use time::{format_kill_time, parse_kill_time, KILL_TIME_FORMAT};

/// Decode a RedisQ response body.
///
/// A top-level JSON `null` yields `Ok(None)`; the caller decides what an absent
/// document means. Null kills (`{"package":null}`) decode to `Some`.
pub fn decode(bytes: &[u8]) -> Result<Option<Kill>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode a RedisQ response body held in a string. See [`decode`].
pub fn decode_str(body: &str) -> Result<Option<Kill>> {
    decode(body.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_top_level_null() {
        assert!(decode(b"null").unwrap().is_none());
    }

    #[test]
    fn test_decode_null_package() {
        let kill = decode(br#"{"package":null}"#).unwrap().unwrap();
        assert!(kill.is_null_kill());
        assert_eq!(kill, Kill::default());
    }

    #[test]
    fn test_decode_empty_body_fails() {
        assert!(matches!(decode(b""), Err(KillmailError::Json(_))));
    }

    #[test]
    fn test_decode_bad_timestamp_fails() {
        let body = r#"{"package":{"killID":1,"killmail":{"killTime":"2017-02-02T19:51:15Z"}}}"#;
        let err = decode_str(body).unwrap_err();
        assert!(err.to_string().contains("2017-02-02T19:51:15Z"));
    }
}
