//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
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

    /// Returns the UTC calendar date of this timestamp.
    pub fn utc_date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Checks if both timestamps fall on the same UTC calendar day.
    pub fn is_same_day(&self, other: &Timestamp) -> bool {
        self.utc_date() == other.utc_date()
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by subtracting the specified number of days.
    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn at(rfc3339: &str) -> Timestamp {
        Timestamp::from_datetime(
            DateTime::parse_from_rfc3339(rfc3339)
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn same_day_ignores_time_of_day() {
        let morning = at("2024-03-10T06:00:00Z");
        let night = at("2024-03-10T23:59:59Z");
        assert!(morning.is_same_day(&night));
    }

    #[test]
    fn different_days_are_not_same_day() {
        let late = at("2024-03-10T23:59:59Z");
        let early = at("2024-03-11T00:00:01Z");
        assert!(!late.is_same_day(&early));
    }

    #[test]
    fn minus_days_moves_to_previous_date() {
        let ts = at("2024-03-10T12:00:00Z").minus_days(1);
        assert_eq!(ts.utc_date().day(), 9);
    }

    #[test]
    fn duration_since_is_signed() {
        let a = at("2024-03-10T12:00:00Z");
        let b = at("2024-03-10T13:00:00Z");
        assert_eq!(b.duration_since(&a), Duration::hours(1));
        assert_eq!(a.duration_since(&b), Duration::hours(-1));
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
    }
}
