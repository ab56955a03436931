//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// UTC timestamp used for `created_at` fields.
pub type Timestamp = DateTime<Utc>;

/// Calendar date without a time component (request dates, work dates).
pub type Date = NaiveDate;

/// Wall-clock time without a date (work start/end times).
pub type TimeOfDay = NaiveTime;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return today's date in UTC.
#[must_use]
pub fn today() -> Date {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_return_today_matching_now() {
        assert_eq!(today(), now().date_naive());
    }
}
