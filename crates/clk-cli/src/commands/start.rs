//! Start command for beginning today's time tracking.

use std::io::Write;

use anyhow::Result;
use clk_core::{Clock, RecordStore, StatisticHandler, Tracker};

use super::view;

pub fn run<W, S, C>(writer: &mut W, tracker: &mut Tracker<S, C>) -> Result<()>
where
    W: Write,
    S: RecordStore,
    C: Clock,
{
    let record = tracker.start()?;
    let handler = StatisticHandler::new(tracker.settings());
    view::write_day(writer, &record, &handler)?;
    Ok(())
}
