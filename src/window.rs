use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

use crate::error::{Result, StepLensError};

/// Half-open UTC interval `[start, end)` used to select runs and jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window for `days` relative to the current instant.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `days` reaches past the range
    /// `chrono` can represent.
    pub fn for_days(days: i64) -> Result<Self> {
        Self::for_days_at(days, Utc::now())
    }

    /// Window for `days` relative to `now`.
    ///
    /// `days == 0` covers today so far, `[midnight, now)`. Any other value
    /// covers the `days` full days before today's midnight. Negative values
    /// are not rejected and yield an inverted window that contains nothing.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the window start overflows.
    pub fn for_days_at(days: i64, now: DateTime<Utc>) -> Result<Self> {
        let midnight = start_of_day(now);
        if days == 0 {
            return Ok(Self {
                start: midnight,
                end: now,
            });
        }

        let start = TimeDelta::try_days(days)
            .and_then(|span| midnight.checked_sub_signed(span))
            .ok_or_else(|| StepLensError::Config(format!("days out of range: {days}")))?;

        Ok(Self {
            start,
            end: midnight,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Value for the GitHub `created` search qualifier.
    pub fn created_qualifier(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%dT%H:%M:%SZ"),
            self.end.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}

fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn zero_days_spans_midnight_to_now() {
        let now = at(2024, 3, 15, 14, 30);
        let window = TimeWindow::for_days_at(0, now).unwrap();

        assert_eq!(window.start, at(2024, 3, 15, 0, 0));
        assert_eq!(window.end, now);
        assert!(window.end >= window.start);
    }

    #[test]
    fn zero_days_right_at_midnight_is_empty() {
        let now = at(2024, 3, 15, 0, 0);
        let window = TimeWindow::for_days_at(0, now).unwrap();

        assert_eq!(window.start, window.end);
        assert!(!window.contains(now));
    }

    #[test]
    fn n_days_ends_at_most_recent_midnight() {
        let now = at(2024, 3, 15, 14, 30);
        let window = TimeWindow::for_days_at(7, now).unwrap();

        assert_eq!(window.end, at(2024, 3, 15, 0, 0));
        assert_eq!(window.start, at(2024, 3, 8, 0, 0));
        assert_eq!(window.end - window.start, TimeDelta::days(7));
    }

    #[test]
    fn window_is_half_open() {
        let window = TimeWindow::for_days_at(1, at(2024, 3, 15, 9, 0)).unwrap();

        assert!(window.contains(at(2024, 3, 14, 0, 0)));
        assert!(window.contains(at(2024, 3, 14, 23, 59)));
        assert!(!window.contains(at(2024, 3, 15, 0, 0)));
        assert!(!window.contains(at(2024, 3, 13, 23, 59)));
    }

    #[test]
    fn negative_days_produce_inverted_window() {
        let window = TimeWindow::for_days_at(-2, at(2024, 3, 15, 9, 0)).unwrap();

        assert!(window.start > window.end);
        assert!(!window.contains(at(2024, 3, 16, 0, 0)));
    }

    #[test]
    fn huge_day_counts_are_a_config_error() {
        let now = at(2024, 3, 15, 9, 0);

        for days in [1_000_000_000, i64::MAX, i64::MIN] {
            let err = TimeWindow::for_days_at(days, now).unwrap_err();
            assert!(matches!(err, StepLensError::Config(_)), "{days}: {err}");
            assert!(err.to_string().contains("days out of range"));
        }
    }

    #[test]
    fn created_qualifier_uses_github_range_syntax() {
        let window = TimeWindow::for_days_at(2, at(2024, 3, 15, 9, 0)).unwrap();
        assert_eq!(
            window.created_qualifier(),
            "2024-03-13T00:00:00Z..2024-03-15T00:00:00Z"
        );
    }
}
