//! Report command for monthly reports.
//!
//! This module implements `clk report` with human-readable and JSON output.
//! Statistics cover the year up to the last recorded day of the month.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clk_core::time::{format_duration, format_time};
use clk_core::{DayRecord, RecordStore, Settings, StatisticHandler, Statistics};
use serde::Serialize;

use super::view;

// ========== Report Generation ==========

/// Computed report data.
#[derive(Debug)]
pub struct ReportData {
    pub month: u32,
    pub year: i32,
    pub days: Vec<DayRecord>,
    pub statistics: Statistics,
}

/// Loads the month and the statistics of the year up to its last record.
pub fn generate_report_data<S: RecordStore>(
    store: &S,
    handler: &StatisticHandler,
    month: u32,
    year: i32,
) -> Result<ReportData> {
    let days = store
        .load_month(month, year)
        .context("failed to load month")?;
    let until = match days.last() {
        Some(last) => last.date,
        None => NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("invalid month {month:02}/{year}"))?,
    };
    let history = store
        .all_until(until)
        .context("failed to load statistics data")?;
    let statistics = handler.collect(&history)?;

    Ok(ReportData {
        month,
        year,
        days,
        statistics,
    })
}

// ========== Text Output ==========

/// Formats report data as text.
pub fn format_report(data: &ReportData, handler: &StatisticHandler) -> Result<String> {
    let statistics = &data.statistics;
    let rows = view::month_rows(data.year, data.month, &data.days, handler);

    let mut output = Vec::new();
    writeln!(output, "Monthly Report - {:02}/{}", data.month, data.year)?;
    writeln!(output, "[W]orkday, [V]acation, [F]lexday, [S]ick, [H]oliday")?;
    writeln!(output)?;
    view::write_table(&mut output, "", &rows)?;
    writeln!(output)?;
    writeln!(
        output,
        "Vacation Days {}/{} ({}) | Flex Days {} | Sick Days {} | Flextime {}",
        statistics.count.vacation,
        statistics.vacation_days,
        statistics.remaining_vacation_days,
        statistics.count.flex,
        statistics.count.sick,
        format_duration(statistics.flextime)
    )?;
    if let (Some(begin), Some(end), Some(pause)) =
        (statistics.avg_begin, statistics.avg_end, statistics.avg_pause)
    {
        writeln!(
            output,
            "Average Start {} | Average End {} | Average Pause {}",
            format_time(begin),
            format_time(end),
            format_duration(pause)
        )?;
    }

    Ok(String::from_utf8(output)?)
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub month: u32,
    pub year: i32,
    pub days: Vec<JsonDay>,
    pub statistics: JsonStatistics,
}

#[derive(Debug, Serialize)]
pub struct JsonDay {
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub pause: String,
    pub duration: String,
    pub flextime: String,
}

#[derive(Debug, Serialize)]
pub struct JsonStatistics {
    pub work_days: usize,
    pub vacation_days_taken: usize,
    pub flex_days: usize,
    pub sick_days: usize,
    pub holidays: usize,
    pub vacation_days: u32,
    pub remaining_vacation_days: i64,
    pub target_working_days: i64,
    pub target_working_hours: String,
    pub working_hours: String,
    pub flextime: String,
    pub average_start: Option<String>,
    pub average_end: Option<String>,
    pub average_pause: Option<String>,
}

impl From<&Statistics> for JsonStatistics {
    fn from(statistics: &Statistics) -> Self {
        Self {
            work_days: statistics.count.work,
            vacation_days_taken: statistics.count.vacation,
            flex_days: statistics.count.flex,
            sick_days: statistics.count.sick,
            holidays: statistics.count.holiday,
            vacation_days: statistics.vacation_days,
            remaining_vacation_days: statistics.remaining_vacation_days,
            target_working_days: statistics.target_working_days,
            target_working_hours: format_duration(statistics.target_working_hours),
            working_hours: format_duration(statistics.working_hours),
            flextime: format_duration(statistics.flextime),
            average_start: statistics.avg_begin.map(format_time),
            average_end: statistics.avg_end.map(format_time),
            average_pause: statistics.avg_pause.map(format_duration),
        }
    }
}

/// Formats report data as JSON.
pub fn format_report_json(data: &ReportData, handler: &StatisticHandler) -> Result<String> {
    let days = data
        .days
        .iter()
        .map(|record| {
            Ok(JsonDay {
                date: record.date.format("%Y-%m-%d").to_string(),
                kind: record.absence.to_string(),
                start: record.begin.map(format_time),
                end: record.end.map(format_time),
                pause: format_duration(record.pause),
                duration: format_duration(record.duration()),
                flextime: format_duration(handler.flextime(record)?),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let report = JsonReport {
        month: data.month,
        year: data.year,
        days,
        statistics: JsonStatistics::from(&data.statistics),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W, S>(
    writer: &mut W,
    store: &S,
    settings: &Settings,
    month: u32,
    year: i32,
    json: bool,
) -> Result<()>
where
    W: Write,
    S: RecordStore,
{
    let handler = StatisticHandler::new(settings);
    let data = generate_report_data(store, &handler, month, year)?;

    if json {
        let output = format_report_json(&data, &handler)?;
        writeln!(writer, "{output}")?;
    } else {
        let output = format_report(&data, &handler)?;
        write!(writer, "{output}")?;
    }

    Ok(())
}
