//! Holidays command for recording the public holidays of a year.

use std::io::Write;

use anyhow::Result;
use clk_core::time::format_date;
use clk_core::{Clock, RecordStore, Tracker, public_holidays};

pub fn run<W, S, C>(writer: &mut W, tracker: &mut Tracker<S, C>, year: i32) -> Result<()>
where
    W: Write,
    S: RecordStore,
    C: Clock,
{
    let created = tracker.mark_holidays(year)?;

    writeln!(writer, "Public Holidays {year}")?;
    for holiday in public_holidays(year) {
        let status = if created.iter().any(|record| record.date == holiday.date) {
            "added"
        } else {
            "kept existing record"
        };
        writeln!(
            writer,
            "{}  {:<16}  {status}",
            format_date(holiday.date),
            holiday.name
        )?;
    }
    Ok(())
}
