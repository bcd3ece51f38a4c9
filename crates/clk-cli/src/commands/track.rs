//! Track command for manually recording a workday.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clk_core::time::{parse_date, parse_duration, parse_time};
use clk_core::{Clock, RecordStore, StatisticHandler, Tracker};

use super::view;

/// Raw command-line values; `None` keeps the stored value.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackInput<'a> {
    pub date: Option<&'a str>,
    pub begin: Option<&'a str>,
    pub end: Option<&'a str>,
    pub pause: Option<&'a str>,
}

pub fn run<W, S, C>(
    writer: &mut W,
    tracker: &mut Tracker<S, C>,
    input: TrackInput<'_>,
    today: NaiveDate,
) -> Result<()>
where
    W: Write,
    S: RecordStore,
    C: Clock,
{
    let date = input.date.map(parse_date).transpose()?.unwrap_or(today);
    let begin = input.begin.map(parse_time).transpose()?;
    let end = input.end.map(parse_time).transpose()?;
    let pause = input.pause.map(parse_duration).transpose()?;

    let record = tracker.track(date, begin, end, pause)?;
    let handler = StatisticHandler::new(tracker.settings());
    view::write_day(writer, &record, &handler)?;
    Ok(())
}
