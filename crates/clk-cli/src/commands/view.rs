//! Plain-text tables of day records shared by the commands.

use std::io::{self, Write};

use chrono::NaiveDate;
use clk_core::time::{format_date, format_duration, format_time, month_days};
use clk_core::{DayRecord, StatisticHandler, Statistics};

const HEADER: [&str; 7] = [
    "Date", "Type", "Start", "End", "Pause", "Duration", "Flextime",
];
const WIDTHS: [usize; 7] = [14, 4, 8, 8, 8, 9, 9];
/// Columns from this index on are right-aligned.
const FIRST_NUMERIC: usize = 4;

/// Lays out one table line. Trailing blanks are dropped.
fn line(cells: [&str; 7]) -> String {
    let mut out = String::new();
    for (index, (cell, width)) in cells.into_iter().zip(WIDTHS).enumerate() {
        if index > 0 {
            out.push_str("  ");
        }
        if index < FIRST_NUMERIC {
            out.push_str(&format!("{cell:<width$}"));
        } else {
            out.push_str(&format!("{cell:>width$}"));
        }
    }
    out.trim_end().to_string()
}

fn rule() -> String {
    let width = WIDTHS.iter().sum::<usize>() + 2 * (WIDTHS.len() - 1);
    "-".repeat(width)
}

/// Row of a recorded day. Absence days only show their type.
pub fn day_row(record: &DayRecord, handler: &StatisticHandler) -> String {
    let date = format_date(record.date);
    let kind = record.absence.abbreviation().to_string();
    if record.is_absence_day() {
        return line([&date, &kind, "", "", "", "", ""]);
    }

    let begin = record.begin.map(format_time).unwrap_or_default();
    let end = record.end.map(format_time).unwrap_or_default();
    // flextime needs work.duration; the cell stays empty without it
    let flextime = handler
        .flextime(record)
        .map(format_duration)
        .unwrap_or_default();
    line([
        &date,
        &kind,
        &begin,
        &end,
        &format_duration(record.pause),
        &format_duration(record.duration()),
        &flextime,
    ])
}

/// Row of a day without a record.
pub fn empty_row(date: NaiveDate) -> String {
    line([&format_date(date), "", "", "", "", "", ""])
}

/// One row per calendar day of the month; `records` may have gaps.
pub fn month_rows(
    year: i32,
    month: u32,
    records: &[DayRecord],
    handler: &StatisticHandler,
) -> Vec<String> {
    month_days(year, month)
        .into_iter()
        .map(|date| {
            records
                .iter()
                .find(|record| record.date == date)
                .map_or_else(|| empty_row(date), |record| day_row(record, handler))
        })
        .collect()
}

pub fn write_table<W: Write>(writer: &mut W, title: &str, rows: &[String]) -> io::Result<()> {
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", line(HEADER))?;
    writeln!(writer, "{}", rule())?;
    for row in rows {
        writeln!(writer, "{row}")?;
    }
    Ok(())
}

/// Table of a single day.
pub fn write_day<W: Write>(
    writer: &mut W,
    record: &DayRecord,
    handler: &StatisticHandler,
) -> io::Result<()> {
    let title = format!("Working Day - {}", format_date(record.date));
    write_table(writer, &title, &[day_row(record, handler)])
}

/// Table of a set of days in date order.
pub fn write_records<W: Write>(
    writer: &mut W,
    title: &str,
    records: &[DayRecord],
    handler: &StatisticHandler,
) -> io::Result<()> {
    let rows: Vec<_> = records
        .iter()
        .map(|record| day_row(record, handler))
        .collect();
    write_table(writer, title, &rows)
}

/// Summary line of absences and flextime.
pub fn statistics_line(statistics: &Statistics) -> String {
    format!(
        "Vacation {}/{} ({}) | Flexday {} | Sickness {} | Flextime {}",
        statistics.count.vacation,
        statistics.vacation_days,
        statistics.remaining_vacation_days,
        statistics.count.flex,
        statistics.count.sick,
        format_duration(statistics.flextime)
    )
}
