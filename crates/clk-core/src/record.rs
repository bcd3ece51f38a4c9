//! The tracked state of a single calendar day.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::absence::AbsenceKind;
use crate::time::{format_duration, format_time};

/// One entry per calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    /// Identity key of the record.
    pub date: NaiveDate,
    pub absence: AbsenceKind,
    pub begin: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    /// Unpaid break subtracted from the worked span.
    pub pause: Duration,
}

/// Where a record stands in its daily lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayState {
    Empty,
    Started,
    Stopped,
    Absence(AbsenceKind),
}

impl DayRecord {
    /// An empty workday record.
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            absence: AbsenceKind::Workday,
            begin: None,
            end: None,
            pause: Duration::zero(),
        }
    }

    /// A workday record with the given times.
    pub const fn worked(
        date: NaiveDate,
        begin: NaiveTime,
        end: Option<NaiveTime>,
        pause: Duration,
    ) -> Self {
        Self {
            date,
            absence: AbsenceKind::Workday,
            begin: Some(begin),
            end,
            pause,
        }
    }

    /// A record of the given kind without any times.
    pub const fn absence(date: NaiveDate, kind: AbsenceKind) -> Self {
        Self {
            date,
            absence: kind,
            begin: None,
            end: None,
            pause: Duration::zero(),
        }
    }

    pub fn is_absence_day(&self) -> bool {
        self.absence != AbsenceKind::Workday
    }

    pub fn state(&self) -> DayState {
        if self.is_absence_day() {
            return DayState::Absence(self.absence);
        }
        match (self.begin, self.end) {
            (Some(_), Some(_)) => DayState::Stopped,
            (Some(_), None) => DayState::Started,
            (None, _) => DayState::Empty,
        }
    }

    /// Raw time between begin and end, `None` unless both are set.
    pub fn span(&self) -> Option<Duration> {
        Some(self.end? - self.begin?)
    }

    /// Worked time: the span minus the pause.
    ///
    /// A pause that is at least as long as the span is ignored.
    pub fn duration(&self) -> Duration {
        match self.span() {
            Some(span) if self.pause >= span => span,
            Some(span) => span - self.pause,
            None => Duration::zero(),
        }
    }
}

impl fmt::Display for DayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absence_day() {
            return write!(f, "{} ({})", self.date, self.absence);
        }
        let begin = self.begin.map_or_else(|| "-".to_string(), format_time);
        let end = self.end.map_or_else(|| "-".to_string(), format_time);
        write!(
            f,
            "{} {begin} - {end} (pause {})",
            self.date,
            format_duration(self.pause)
        )
    }
}
