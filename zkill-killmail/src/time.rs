//! Timestamp handling for the `killTime` field.
//!
//! RedisQ reports kill times as `YYYY.MM.DD HH:MM:SS` without a zone. The values
//! are server time, which zKillboard keeps in UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::{KillmailError, Result};

/// `chrono` format string of the RedisQ timestamp layout
pub const KILL_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Parse a RedisQ timestamp such as `2017.02.02 19:51:15` as UTC.
pub fn parse_kill_time(value: &str) -> Result<DateTime<Utc>> {
    let naive =
        NaiveDateTime::parse_from_str(value, KILL_TIME_FORMAT).map_err(|source| {
            KillmailError::Time {
                value: value.to_string(),
                source,
            }
        })?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Format a timestamp back into the RedisQ layout.
pub fn format_kill_time(time: &DateTime<Utc>) -> String {
    time.format(KILL_TIME_FORMAT).to_string()
}

/// Serde adapter for `#[serde(with = "...")]` on kill time fields.
///
/// `null` decodes to the default timestamp, matching how a missing field is treated.
pub mod serde_kill_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_kill_time(time))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) => super::parse_kill_time(&value).map_err(serde::de::Error::custom),
            None => Ok(DateTime::<Utc>::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_kill_time() {
        let parsed = parse_kill_time("2017.02.02 19:51:15").unwrap();
        let expected = DateTime::parse_from_rfc3339("2017-02-02T19:51:15Z").unwrap();
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("")]
    #[case("2017-02-02 19:51:15")]
    #[case("2017.02.02T19:51:15")]
    #[case("2017.13.02 19:51:15")]
    #[case("\"2017.02.02 19:51:15\"")]
    fn test_parse_kill_time_rejects(#[case] input: &str) {
        match parse_kill_time(input) {
            Err(KillmailError::Time { value, .. }) => assert_eq!(value, input),
            other => panic!("Expected time error for {:?}, got {:?}", input, other),
        }
    }

    #[test]
    fn test_format_kill_time() {
        let time = parse_kill_time("2016.12.31 23:59:59").unwrap();
        assert_eq!(format_kill_time(&time), "2016.12.31 23:59:59");
    }
}
