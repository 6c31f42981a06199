//! Calendar and formatting helpers
//!
//! Year arithmetic deliberately uses a fixed 365.25-day year rather than
//! Gregorian-aware math: the drift is an accepted, documented property of
//! the world calendar, not something to hide behind a calendar library.
//! Month arithmetic, by contrast, is calendar-correct. All rendering uses
//! a fixed UTC-equivalent calendar so output never depends on the host
//! timezone.

use chrono::{DateTime, Duration, Months, Timelike, Utc};

use crate::config::ClockConfig;

/// Length of a world year in days. An explicit approximation: world-year
/// arithmetic is not Gregorian-calendar-aware.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Milliseconds in one approximate world year.
const MS_PER_YEAR: f64 = DAYS_PER_YEAR * 24.0 * 60.0 * 60.0 * 1000.0;

/// Fractional years elapsed between two instants, using the 365.25-day
/// approximation. Negative when `to` precedes `from`.
#[must_use]
pub fn years_elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_YEAR
}

/// The world calendar year a world-time instant falls in:
/// whole approximate years since the world epoch, offset by the epoch's
/// calendar year.
#[must_use]
pub fn current_world_year(cfg: &ClockConfig, t: DateTime<Utc>) -> i32 {
    #[allow(clippy::cast_possible_truncation)]
    let whole_years = years_elapsed(cfg.world_epoch, t).floor() as i32;
    whole_years + cfg.world_epoch_year()
}

/// Adds a (possibly fractional or negative) number of approximate years.
#[must_use]
pub fn add_years(t: DateTime<Utc>, years: f64) -> DateTime<Utc> {
    #[allow(clippy::cast_possible_truncation)]
    let offset_ms = (years * MS_PER_YEAR).round() as i64;
    t + Duration::milliseconds(offset_ms)
}

/// Adds a signed number of calendar months, carrying into year boundaries
/// and clamping the day-of-month where the target month is shorter.
///
/// Returns `None` only if the result would fall outside the representable
/// date range.
#[must_use]
pub fn add_months(t: DateTime<Utc>, months: i32) -> Option<DateTime<Utc>> {
    if months >= 0 {
        t.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        t.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Renders a world-time instant for humans: weekday, month name, day and
/// year, optionally followed by a zero-padded `HH:MM:SS`, always carrying
/// the fixed `(ILT)` suffix denoting in-world local time.
///
/// Rendering uses the UTC calendar regardless of the host timezone.
#[must_use]
pub fn format_world_time(t: DateTime<Utc>, include_time: bool) -> String {
    if include_time {
        format!(
            "{} {:02}:{:02}:{:02} (ILT)",
            t.format("%A, %B %-d, %Y"),
            t.hour(),
            t.minute(),
            t.second()
        )
    } else {
        format!("{} (ILT)", t.format("%A, %B %-d, %Y"))
    }
}
