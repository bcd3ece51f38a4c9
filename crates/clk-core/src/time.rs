//! Parsing, formatting and rounding of dates, times and durations.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::error::ValidationError;

/// Length of a rounding step in minutes.
const QUARTER_MINUTES: u32 = 15;

/// A start time rounds up to the next quarter once more than this many
/// minutes of the current quarter have passed.
const START_ROUND_UP_AFTER: u32 = 10;

/// Same threshold for end times.
const END_ROUND_UP_AFTER: u32 = 5;

/// Parses a date given as `dd.mm.yyyy` or `yyyy-mm-dd`.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Parses a time of day given as `hh:mm` or `hh:mm:ss`.
pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    let value = value.trim();
    let format = if value.matches(':').count() > 1 {
        "%H:%M:%S"
    } else {
        "%H:%M"
    };
    NaiveTime::parse_from_str(value, format)
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

/// Parses a non-negative duration given as `h:mm` or `h:mm:ss`.
///
/// Unlike [`parse_time`] the hour part is unbounded, so `25:30` is valid.
pub fn parse_duration(value: &str) -> Result<Duration, ValidationError> {
    let trimmed = value.trim();
    let invalid = || ValidationError::InvalidDuration(trimmed.to_string());

    let parts: Vec<&str> = trimmed.split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m] => (*h, *m, "0"),
        [h, m, s] => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
    let seconds: i64 = seconds.parse().map_err(|_| invalid())?;
    if hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return Err(invalid());
    }

    let hours = Duration::try_hours(hours).ok_or_else(invalid)?;
    Ok(hours + Duration::minutes(minutes) + Duration::seconds(seconds))
}

/// Formats a date for display, e.g. `Mon 03.01.2022`.
pub fn format_date(value: NaiveDate) -> String {
    value.format("%a %d.%m.%Y").to_string()
}

/// Formats a time of day as `hh:mm:ss`.
pub fn format_time(value: NaiveTime) -> String {
    value.format("%H:%M:%S").to_string()
}

/// Formats a signed duration as `h:mm:ss`; negative values get a leading `-`.
pub fn format_duration(value: Duration) -> String {
    let total = value.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Formats a duration with a zero-padded hour, `hh:mm:ss`.
///
/// This is the layout pauses are persisted in.
pub fn format_clock_duration(value: Duration) -> String {
    let total = value.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    format!(
        "{sign}{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Drops the fractional seconds of a time.
pub fn truncate_subsec(value: NaiveTime) -> NaiveTime {
    value - Duration::nanoseconds(i64::from(value.nanosecond() % 1_000_000_000))
}

/// Rounds down to the start of the current quarter hour.
pub fn floor_quarter(value: NaiveTime) -> NaiveTime {
    let into_quarter = (value.minute() % QUARTER_MINUTES) * 60 + value.second();
    truncate_subsec(value) - Duration::seconds(i64::from(into_quarter))
}

/// Rounds a start time to a quarter hour.
///
/// Rounds up only when more than ten minutes of the quarter have passed,
/// so `08:41` becomes `08:45` while `08:40` becomes `08:30`.
pub fn round_start_quarter(value: NaiveTime) -> NaiveTime {
    round_quarter(value, START_ROUND_UP_AFTER)
}

/// Rounds an end time to a quarter hour.
///
/// Rounds up when more than five minutes of the quarter have passed.
pub fn round_end_quarter(value: NaiveTime) -> NaiveTime {
    round_quarter(value, END_ROUND_UP_AFTER)
}

/// Rounding past `23:59` wraps around to `00:00`.
fn round_quarter(value: NaiveTime, round_up_after: u32) -> NaiveTime {
    let floor = floor_quarter(value);
    if value.minute() % QUARTER_MINUTES > round_up_after {
        floor + Duration::minutes(i64::from(QUARTER_MINUTES))
    } else {
        floor
    }
}

/// Whether the date falls on Monday to Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// All Monday-to-Friday dates in `start..=end`.
pub fn weekdays(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    days(start, end).filter(|day| is_weekday(*day))
}

/// All dates in `start..=end`.
pub fn days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Counts the weekdays strictly after `first` up to and including `last`.
pub fn count_workdays(first: NaiveDate, last: NaiveDate) -> i64 {
    let count = days(first, last)
        .skip(1)
        .filter(|day| is_weekday(*day))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Last calendar day of a month, `None` for an invalid month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Every calendar day of a month; empty for an invalid month.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        last_day_of_month(year, month),
    ) {
        (Some(first), Some(last)) => days(first, last).collect(),
        _ => Vec::new(),
    }
}
