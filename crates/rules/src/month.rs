//! Elapsed-time arithmetic within a UTC calendar month.

use chrono::{DateTime, Datelike, Timelike, Utc};

const SECS_PER_HOUR: f64 = 3_600.0;

/// How far `now` is into its calendar month, in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthProgress {
    pub hours_elapsed: f64,
    pub hours_in_month: f64,
}

impl MonthProgress {
    /// Progress of the UTC month containing `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        let days = days_in_month(now.year(), now.month());
        let elapsed_secs = f64::from(now.day0()) * 86_400.0
            + f64::from(now.num_seconds_from_midnight())
            + f64::from(now.nanosecond()) / 1e9;
        Self {
            hours_elapsed: elapsed_secs / SECS_PER_HOUR,
            hours_in_month: f64::from(days) * 24.0,
        }
    }

    /// Linear month-end extrapolation factor (`hours_in_month / hours_elapsed`),
    /// `None` at the very start of the month.
    pub fn extrapolation_factor(&self) -> Option<f64> {
        (self.hours_elapsed > 0.0).then(|| self.hours_in_month / self.hours_elapsed)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
