//! # Timestamps
//!
//! [`Timestamp`] is the instant recorded on audit entries and packs. It is
//! held in UTC at whole-second precision and always rendered as
//! `YYYY-MM-DDTHH:MM:SSZ`. The rendered form is part of every audit entry
//! hash, so two readings of the same instant must produce the same string.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// UTC instant at whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current second.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a chrono instant, dropping sub-second precision.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Parse an RFC 3339 string written in UTC with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// `InvalidTimestamp` for malformed input and for any explicit offset,
    /// including `+00:00`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.strip_suffix('Z') {
            Some(_) => Self::parse_lenient(s),
            None => Err(invalid(s, "expected UTC with a Z suffix")),
        }
    }

    /// Parse an RFC 3339 string with any offset, normalizing to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, ValidationError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_utc(dt.with_timezone(&Utc)))
            .map_err(|e| invalid(s, &e.to_string()))
    }

    /// The underlying chrono value.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// `YYYYMMDD`, the date segment of pack identifiers.
    pub fn compact_date(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

fn invalid(value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidTimestamp {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Stored records may carry offsets written by other systems; accept them
// and normalize.
impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse_lenient(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_renders_without_fraction_or_offset() {
        let dt = Utc
            .with_ymd_and_hms(2026, 3, 1, 8, 5, 9)
            .unwrap()
            .with_nanosecond(999_000_000)
            .unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_iso8601(), "2026-03-01T08:05:09Z");
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_strict_parse_requires_z() {
        assert!(Timestamp::parse("2026-01-15T10:00:00Z").is_ok());
        for rejected in [
            "2026-01-15T10:00:00+00:00",
            "2026-01-15T15:00:00+05:00",
            "2026-01-15",
            "Z",
            "",
        ] {
            assert!(Timestamp::parse(rejected).is_err(), "{rejected}");
        }
    }

    #[test]
    fn test_fractional_seconds_dropped_on_parse() {
        let ts = Timestamp::parse("2026-01-15T10:00:00.750Z").unwrap();
        assert_eq!(ts, Timestamp::parse("2026-01-15T10:00:00Z").unwrap());
    }

    #[test]
    fn test_lenient_parse_normalizes_offset() {
        let ts = Timestamp::parse_lenient("2026-01-15T15:30:00+05:30").unwrap();
        assert_eq!(ts.to_string(), "2026-01-15T10:00:00Z");
    }

    #[test]
    fn test_compact_date_uses_utc_day() {
        let ts = Timestamp::parse_lenient("2026-01-16T01:00:00+02:00").unwrap();
        assert_eq!(ts.compact_date(), "20260115");
    }

    #[test]
    fn test_json_form_is_the_iso_string() {
        let ts = Timestamp::parse("2026-01-15T10:00:00Z").unwrap();
        assert_eq!(serde_json::to_value(ts).unwrap(), "2026-01-15T10:00:00Z");
        let back: Timestamp = serde_json::from_str("\"2026-01-15T11:00:00+01:00\"").unwrap();
        assert_eq!(back, ts);
        assert!(serde_json::from_str::<Timestamp>("\"soon\"").is_err());
    }
}
