//! Timestamp handling shared by the key-derivation salt and the persisted record.
//!
//! Both sides must agree bit-for-bit: a stored upload time that re-parses to a
//! different instant derives a different key and the document becomes
//! unreadable. Everything is UTC, whole seconds, `YYYY-MM-DD HH:MM:SS`.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// The one timestamp format used for salts and storage.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("Invalid stored timestamp {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("Timestamp out of range")]
    OutOfRange,
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, TimestampError> {
    NaiveDateTime::parse_from_str(value, STORAGE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TimestampError::Parse {
            value: value.to_string(),
            source,
        })
}

/// Round to the nearest whole second, halves away from zero.
pub fn round_to_second(ts: DateTime<Utc>) -> Result<DateTime<Utc>, TimestampError> {
    let mut secs = ts.timestamp();
    if ts.timestamp_subsec_nanos() >= 500_000_000 {
        secs += 1;
    }
    DateTime::from_timestamp(secs, 0).ok_or(TimestampError::OutOfRange)
}

/// `now`, already rounded. Upload stamps always come from here.
pub fn now_rounded() -> Result<DateTime<Utc>, TimestampError> {
    round_to_second(Utc::now())
}

/// The marker stored for "delete after first read".
pub fn volatile_marker() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// How a document's expiration timestamp is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpirationPolicy {
    /// No expiration set.
    Never,
    /// At or before epoch + 1ns: deleted after the first read.
    Volatile,
    /// Reads fail once this instant has passed.
    At(DateTime<Utc>),
}

impl ExpirationPolicy {
    pub fn classify(expiration: Option<DateTime<Utc>>) -> Self {
        match expiration {
            None => ExpirationPolicy::Never,
            Some(ts) if ts <= volatile_threshold() => ExpirationPolicy::Volatile,
            Some(ts) => ExpirationPolicy::At(ts),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self, ExpirationPolicy::At(ts) if *ts < now)
    }
}

fn volatile_threshold() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH + chrono::TimeDelta::nanoseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_and_parse_agree() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 7).unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2024-02-29 23:59:07");
        assert_eq!(parse_timestamp(&text).unwrap(), ts);
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!(parse_timestamp("2024-02-29T23:59:07Z").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn rounding_goes_to_nearest_second() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let down = base + chrono::TimeDelta::milliseconds(499);
        let up = base + chrono::TimeDelta::milliseconds(500);
        assert_eq!(round_to_second(down).unwrap(), base);
        assert_eq!(
            round_to_second(up).unwrap(),
            base + chrono::TimeDelta::seconds(1)
        );
    }

    #[test]
    fn classification() {
        assert_eq!(ExpirationPolicy::classify(None), ExpirationPolicy::Never);
        assert_eq!(
            ExpirationPolicy::classify(Some(DateTime::UNIX_EPOCH)),
            ExpirationPolicy::Volatile
        );
        assert_eq!(
            ExpirationPolicy::classify(Some(volatile_threshold())),
            ExpirationPolicy::Volatile
        );
        let before_epoch = Utc.with_ymd_and_hms(1960, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            ExpirationPolicy::classify(Some(before_epoch)),
            ExpirationPolicy::Volatile
        );
        let later = DateTime::UNIX_EPOCH + chrono::TimeDelta::seconds(1);
        assert_eq!(
            ExpirationPolicy::classify(Some(later)),
            ExpirationPolicy::At(later)
        );
    }
}
