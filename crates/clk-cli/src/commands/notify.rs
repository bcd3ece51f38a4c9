//! Notify command for recording absence days.

use std::io::Write;

use anyhow::Result;
use clk_core::time::parse_date;
use clk_core::{AbsenceKind, Clock, RecordStore, StatisticHandler, Tracker};

use super::view;

pub fn run<W, S, C>(
    writer: &mut W,
    tracker: &mut Tracker<S, C>,
    start: &str,
    end: Option<&str>,
    absence: &str,
) -> Result<()>
where
    W: Write,
    S: RecordStore,
    C: Clock,
{
    let kind: AbsenceKind = absence.parse()?;
    let start = parse_date(start)?;
    let end = end.map(parse_date).transpose()?.unwrap_or(start);

    let touched = tracker.notify(start, end, kind)?;
    let handler = StatisticHandler::new(tracker.settings());
    view::write_records(writer, "Absence Days", &touched, &handler)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clk_core::{DayRecord, ValidationError};
    use insta::assert_snapshot;

    use crate::commands::test_support::{at, date, output, tracker_at};

    #[test]
    fn notify_lists_absence_days_without_weekend() {
        let mut tracker = tracker_at(at(date(2022, 1, 20), 12, 0, 0));

        let mut buffer = Vec::new();
        run(&mut buffer, &mut tracker, "10.01.2022", Some("17.01.2022"), "v").unwrap();

        assert_snapshot!(output(buffer), @r"
        Absence Days
        Date            Type  Start     End          Pause   Duration   Flextime
        ------------------------------------------------------------------------
        Mon 10.01.2022  V
        Tue 11.01.2022  V
        Wed 12.01.2022  V
        Thu 13.01.2022  V
        Fri 14.01.2022  V
        Mon 17.01.2022  V
        ");
    }

    #[test]
    fn notify_keeps_holidays() {
        let mut tracker = tracker_at(at(date(2022, 1, 20), 12, 0, 0));
        let holiday = DayRecord::absence(date(2022, 1, 6), AbsenceKind::Holiday);
        tracker.store_mut().store(&holiday).unwrap();

        run(&mut Vec::new(), &mut tracker, "06.01.2022", None, "F").unwrap();

        assert_eq!(tracker.store().load(holiday.date).unwrap(), Some(holiday));
    }

    #[test]
    fn unknown_absence_type_is_rejected() {
        let mut tracker = tracker_at(at(date(2022, 1, 20), 12, 0, 0));

        let err = run(&mut Vec::new(), &mut tracker, "10.01.2022", None, "X").unwrap_err();

        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnknownAbsence("X".to_string()))
        );
        assert!(tracker.store().is_empty());
    }
}
