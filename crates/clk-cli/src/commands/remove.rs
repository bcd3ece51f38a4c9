//! Remove command for deleting one or more days.

use std::io::Write;

use anyhow::Result;
use clk_core::time::{format_date, parse_date};
use clk_core::{Clock, RecordStore, StatisticHandler, Tracker};

use super::view;

pub fn run<W, S, C>(
    writer: &mut W,
    tracker: &mut Tracker<S, C>,
    start: &str,
    end: Option<&str>,
) -> Result<()>
where
    W: Write,
    S: RecordStore,
    C: Clock,
{
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?.unwrap_or(start);

    let removed = tracker.remove_range(start, end)?;
    if removed.is_empty() {
        writeln!(
            writer,
            "No entries between {} and {}.",
            format_date(start),
            format_date(end)
        )?;
        return Ok(());
    }

    let handler = StatisticHandler::new(tracker.settings());
    view::write_records(writer, "Removed Entries", &removed, &handler)?;
    Ok(())
}
