//! Utils module.
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Format of issuance timestamps: whole seconds, UTC, literal `Z` suffix.
const ISSUANCE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Clock reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Fixed clock at a Unix time in seconds. Out of range values fall back to the epoch.
    pub fn from_timestamp(secs: i64) -> Self {
        Self(
            Utc.timestamp_opt(secs, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Issuance date for a credential issued now, e.g. `2023-05-01T12:00:00Z`.
pub fn issuance_date(clock: &dyn Clock) -> String {
    clock.now().format(ISSUANCE_DATE_FORMAT).to_string()
}

/// Canonical form of a JSON value under the [JSON Canonicalization Scheme](https://www.rfc-editor.org/rfc/rfc8785).
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_jcs::to_string(value)
}

/// Hex encoded SHA-256 digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_issuance_date_truncates_to_seconds() {
        let instant = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_milli_opt(12, 30, 45, 987)
            .unwrap()
            .and_utc();
        let clock = FixedClock::new(instant);
        assert_eq!(issuance_date(&clock), "2023-05-01T12:30:45Z");
    }

    #[test]
    fn test_issuance_date_from_timestamp() {
        let clock = FixedClock::from_timestamp(1666265405);
        assert_eq!(issuance_date(&clock), "2022-10-20T11:30:05Z");
    }

    #[test]
    fn test_system_clock_format() {
        let date = issuance_date(&SystemClock);
        assert_eq!(date.len(), "2023-05-01T12:30:45Z".len());
        assert!(date.ends_with('Z'));
        assert!(!date.contains('.'));
    }

    #[test]
    fn test_canonicalize() {
        let value = serde_json::json!({"b": 1, "a": [true, null]});
        assert_eq!(canonicalize(&value).unwrap(), r#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
