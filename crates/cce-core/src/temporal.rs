//! # Local Date-Times
//!
//! The event schemas distinguish two kinds of timestamps:
//!
//! - `date-time` — RFC 3339 with a mandatory offset (`Z`, `+02:00`, ...).
//!   Bound to `chrono::DateTime<FixedOffset>`.
//! - `local-date-time` — the same wall-clock layout with **no** offset or
//!   zone designator (`2024-01-01T08:30:00`, optionally with a fraction).
//!   Bound to [`LocalDateTime`].
//!
//! [`is_local_date_time`] is the predicate behind the `local-date-time`
//! schema format; it is stricter than chrono's parser alone, which accepts
//! unpadded fields.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A date-time with no timezone information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDateTime(NaiveDateTime);

impl LocalDateTime {
    /// Wrap a `chrono::NaiveDateTime`.
    pub fn new(dt: NaiveDateTime) -> Self {
        Self(dt)
    }

    /// Parse a `local-date-time` string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLocalDateTime`] if the value has the wrong
    /// layout, carries an offset, or names an impossible calendar date or
    /// time of day.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidLocalDateTime(s.to_string());
        if !has_local_layout(s) {
            return Err(invalid());
        }
        let dt = NaiveDateTime::parse_from_str(s, LOCAL_FORMAT).map_err(|_| invalid())?;
        // chrono reads second 60 as a leap second at any time of day.
        if dt.nanosecond() >= 1_000_000_000 {
            return Err(invalid());
        }
        Ok(Self(dt))
    }

    /// Access the inner `NaiveDateTime`.
    pub fn as_naive(&self) -> &NaiveDateTime {
        &self.0
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS`, with a fraction only when non-zero.
    pub fn to_iso8601(&self) -> String {
        self.0.format(LOCAL_FORMAT).to_string()
    }
}

impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl FromStr for LocalDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDateTime> for LocalDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt)
    }
}

impl Serialize for LocalDateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for LocalDateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Returns true if `s` is a valid `local-date-time`.
pub fn is_local_date_time(s: &str) -> bool {
    LocalDateTime::parse(s).is_ok()
}

/// Checks the exact `YYYY-MM-DDTHH:MM:SS[.d{1,9}]` layout.
fn has_local_layout(s: &str) -> bool {
    let b = s.as_bytes();
    if b.len() < 19 {
        return false;
    }
    let digits = |range: std::ops::Range<usize>| b[range].iter().all(u8::is_ascii_digit);
    let head_ok = digits(0..4)
        && b[4] == b'-'
        && digits(5..7)
        && b[7] == b'-'
        && digits(8..10)
        && b[10] == b'T'
        && digits(11..13)
        && b[13] == b':'
        && digits(14..16)
        && b[16] == b':'
        && digits(17..19);
    if !head_ok {
        return false;
    }
    match &b[19..] {
        [] => true,
        [b'.', fraction @ ..] => {
            !fraction.is_empty() && fraction.len() <= 9 && fraction.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_plain() {
        let ts = LocalDateTime::parse("2024-01-01T08:30:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-01T08:30:00");
    }

    #[test]
    fn test_parse_fraction() {
        let ts = LocalDateTime::parse("2024-01-01T08:30:00.250").unwrap();
        assert_eq!(ts.as_naive().nanosecond(), 250_000_000);
        assert_eq!(ts.to_iso8601(), "2024-01-01T08:30:00.250");
    }

    #[test]
    fn test_offsets_rejected() {
        assert!(LocalDateTime::parse("2024-01-01T08:30:00Z").is_err());
        assert!(LocalDateTime::parse("2024-01-01T08:30:00+02:00").is_err());
        assert!(LocalDateTime::parse("2024-01-01T08:30:00.5-04:00").is_err());
    }

    #[test]
    fn test_layout_rejected() {
        assert!(!is_local_date_time("2024-1-01T08:30:00"));
        assert!(!is_local_date_time("2024-01-01 08:30:00"));
        assert!(!is_local_date_time("2024-01-01T08:30"));
        assert!(!is_local_date_time("2024-01-01T08:30:00."));
        assert!(!is_local_date_time("2024-01-01T08:30:00.1234567890"));
        assert!(!is_local_date_time(""));
    }

    #[test]
    fn test_impossible_calendar_date_rejected() {
        assert!(!is_local_date_time("2023-02-29T00:00:00"));
        assert!(!is_local_date_time("2024-13-01T00:00:00"));
        assert!(!is_local_date_time("2024-01-01T25:00:00"));
        assert!(!is_local_date_time("2024-01-01T12:30:60"));
        assert!(!is_local_date_time("2024-01-01T23:59:60"));
        assert!(!is_local_date_time("2024-01-01T23:59:60.500"));
        assert!(!is_local_date_time("2024-01-01T12:60:00"));
        assert!(is_local_date_time("2024-02-29T00:00:00"));
        assert!(is_local_date_time("2024-01-01T23:59:59.999999999"));
    }

    #[test]
    fn test_serde_uses_local_format() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 0)
            .unwrap();
        let json = serde_json::to_string(&LocalDateTime::new(dt)).unwrap();
        assert_eq!(json, "\"2024-03-09T07:05:00\"");
        let back: LocalDateTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_naive(), &dt);
    }

    #[test]
    fn test_deserialize_rejects_offset() {
        let err = serde_json::from_str::<LocalDateTime>("\"2024-03-09T07:05:00Z\"");
        assert!(err.is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn local_values_accepted_offsets_rejected(
                secs in 0i64..4_102_444_800,
                offset_minutes in -720i32..=840,
            ) {
                let dt = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
                let local = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
                prop_assert!(is_local_date_time(&local));

                let sign = if offset_minutes < 0 { '-' } else { '+' };
                let abs = offset_minutes.abs();
                let with_offset = format!("{local}{sign}{:02}:{:02}", abs / 60, abs % 60);
                prop_assert!(!is_local_date_time(&with_offset));
                let zulu = format!("{local}Z");
                prop_assert!(!is_local_date_time(&zulu));
            }
        }
    }
}
