//! Pure display formatting helpers shared by every frontend.

use chrono::{NaiveDate, NaiveDateTime};

use crate::model::{HourlyEntry, UnitSystem};

/// Default number of hourly entries shown by the hourly chart.
pub const HOURLY_WINDOW: usize = 12;

/// Render a temperature as a whole number with its unit suffix.
///
/// Rounds half away from zero (`21.5` becomes `22`, `-2.5` becomes `-3`).
pub fn format_temperature(value: f64, units: UnitSystem) -> String {
    let suffix = match units {
        UnitSystem::Metric => "C",
        UnitSystem::Imperial => "F",
    };
    format!("{}\u{b0}{suffix}", value.round() as i64)
}

/// Render a calendar date as abbreviated weekday, abbreviated month and
/// unpadded day of month, e.g. `Mon Jan 5`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}

/// Render a local time on a 12-hour clock with an AM/PM marker,
/// e.g. `1:05 PM`.
pub fn format_time(time: NaiveDateTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// First `limit` hourly entries in source order, fewer if the source is
/// shorter. Never wraps or resamples.
pub fn window_hourly(hourly: &[HourlyEntry], limit: usize) -> &[HourlyEntry] {
    &hourly[..hourly.len().min(limit)]
}
