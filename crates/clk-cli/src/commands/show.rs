//! Show command for the month overview and statistics.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clk_core::time::last_day_of_month;
use clk_core::{RecordStore, Settings, StatisticHandler};

use super::view;

/// Last day included in the statistics of a month.
///
/// The current month is evaluated up to yesterday, other months up to their
/// last day.
fn statistics_until(month: u32, year: i32, today: NaiveDate) -> Result<NaiveDate> {
    if today.year() == year && today.month() == month {
        let yesterday = today.pred_opt().filter(|day| day.year() == year);
        return Ok(yesterday.unwrap_or(today));
    }
    last_day_of_month(year, month).with_context(|| format!("invalid month {month:02}/{year}"))
}

pub fn run<W, S>(
    writer: &mut W,
    store: &S,
    settings: &Settings,
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<()>
where
    W: Write,
    S: RecordStore,
{
    let handler = StatisticHandler::new(settings);
    let records = store
        .load_month(month, year)
        .context("failed to load month")?;
    let until = statistics_until(month, year, today)?;
    let history = store
        .all_until(until)
        .context("failed to load statistics data")?;
    let statistics = handler.collect(&history)?;

    let rows = view::month_rows(year, month, &records, &handler);
    view::write_table(writer, &format!("Working Days - {month:02}/{year}"), &rows)?;
    writeln!(writer)?;
    writeln!(writer, "{}", view::statistics_line(&statistics))?;
    Ok(())
}
