//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Seconds outside chrono's representable range clamp to the
    /// nearest representable instant, so a wild input stays a wild
    /// (but deterministic) timestamp instead of becoming "now".
    pub fn from_unix_secs(secs: i64) -> Self {
        use chrono::TimeZone;
        match Utc.timestamp_opt(secs, 0).single() {
            Some(dt) => Self(dt),
            None if secs < 0 => Self(DateTime::<Utc>::MIN_UTC),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: u64) -> Self {
        Self(self.0 + Duration::seconds(secs as i64))
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: u64) -> Self {
        Self(self.0 - Duration::seconds(secs as i64))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn timestamp_from_unix_secs_roundtrips() {
        let ts = Timestamp::from_unix_secs(1705276800);
        assert_eq!(ts.as_unix_secs(), 1705276800);
    }

    #[test]
    fn out_of_range_unix_secs_clamp_deterministically() {
        let far_future = Timestamp::from_unix_secs(i64::MAX);
        let far_past = Timestamp::from_unix_secs(i64::MIN);

        assert_eq!(far_future, Timestamp::from_unix_secs(i64::MAX));
        assert_eq!(far_past, Timestamp::from_unix_secs(i64::MIN));
        assert!(far_past.is_before(&far_future));
        assert!(far_future.is_after(&Timestamp::now()));
        assert!(far_past.is_before(&Timestamp::now()));
    }

    #[test]
    fn timestamp_plus_secs_adds_correctly() {
        let ts = Timestamp::from_unix_secs(1000);
        assert_eq!(ts.plus_secs(60).as_unix_secs(), 1060);
    }

    #[test]
    fn timestamp_minus_secs_subtracts_correctly() {
        let ts = Timestamp::from_unix_secs(1000);
        assert_eq!(ts.minus_secs(60).as_unix_secs(), 940);
    }

    #[test]
    fn timestamp_ordering_works() {
        let earlier = Timestamp::from_unix_secs(100);
        let later = Timestamp::from_unix_secs(200);

        assert!(earlier.is_before(&later));
        assert!(later.is_after(&earlier));
        assert!(earlier < later);
    }

    #[test]
    fn timestamp_serializes_to_rfc3339_json() {
        let ts = Timestamp::from_unix_secs(1705276800);
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("2024-01-15"));
    }
}
