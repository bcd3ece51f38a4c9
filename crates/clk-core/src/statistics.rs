//! Aggregation of day records into yearly or monthly statistics.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};

use crate::absence::{AbsenceKind, Credit};
use crate::error::{Error, Result, ValidationError};
use crate::record::DayRecord;
use crate::settings::Settings;
use crate::time::{count_workdays, is_weekday};

/// Number of days per absence kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCount {
    pub work: usize,
    pub vacation: usize,
    pub flex: usize,
    pub sick: usize,
    pub holiday: usize,
}

impl DayCount {
    fn add(&mut self, kind: AbsenceKind) {
        match kind {
            AbsenceKind::Workday => self.work += 1,
            AbsenceKind::Vacation => self.vacation += 1,
            AbsenceKind::Flexday => self.flex += 1,
            AbsenceKind::Sickness => self.sick += 1,
            AbsenceKind::Holiday => self.holiday += 1,
        }
    }
}

/// Statistics over a set of day records from one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub count: DayCount,
    /// Worked time plus the credit for vacation and sick days.
    pub working_hours: Duration,
    /// `working_hours - target_working_hours`.
    pub flextime: Duration,
    /// Configured yearly vacation allotment.
    pub vacation_days: u32,
    /// Allotment minus taken vacation days; negative when overdrawn.
    pub remaining_vacation_days: i64,
    pub target_working_days: i64,
    pub target_working_hours: Duration,
    pub avg_begin: Option<NaiveTime>,
    pub avg_end: Option<NaiveTime>,
    pub avg_pause: Option<Duration>,
    /// Records with both begin and end, the base of the averages.
    pub tracked_days: usize,
}

impl Statistics {
    fn empty(vacation_days: u32) -> Self {
        Self {
            count: DayCount::default(),
            working_hours: Duration::zero(),
            flextime: Duration::zero(),
            vacation_days,
            remaining_vacation_days: i64::from(vacation_days),
            target_working_days: 0,
            target_working_hours: Duration::zero(),
            avg_begin: None,
            avg_end: None,
            avg_pause: None,
            tracked_days: 0,
        }
    }
}

/// Computes statistics and per-day flextime from a settings snapshot.
#[derive(Debug, Clone, Copy)]
pub struct StatisticHandler {
    settings: Settings,
}

impl StatisticHandler {
    pub const fn new(settings: &Settings) -> Self {
        Self {
            settings: *settings,
        }
    }

    fn target_hours(&self) -> Result<Duration> {
        self.settings.work.duration.ok_or(Error::MissingSetting {
            section: "work",
            key: "duration",
        })
    }

    /// Difference between the worked time of a stopped workday and the
    /// daily target. Zero for absences and days without an end.
    pub fn flextime(&self, record: &DayRecord) -> Result<Duration> {
        let target = self.target_hours()?;
        if record.is_absence_day() || record.end.is_none() {
            return Ok(Duration::zero());
        }
        Ok(record.duration() - target)
    }

    /// Collects statistics over `records`.
    ///
    /// The target covers every weekday from January 1st of the records' year
    /// up to the last record, so days without a record count against the
    /// flextime.
    pub fn collect(&self, records: &[DayRecord]) -> Result<Statistics> {
        let vacation_days = self.settings.work.vacation_days.unwrap_or(0);
        let mut statistics = Statistics::empty(vacation_days);

        let mut records = records.to_vec();
        records.sort_by_key(|record| record.date);
        let (Some(first), Some(last)) = (records.first(), records.last()) else {
            return Ok(statistics);
        };
        if first.date.year() != last.date.year() {
            return Err(ValidationError::MixedYears {
                first: first.date.year(),
                last: last.date.year(),
            }
            .into());
        }

        let target = self.target_hours()?;
        let Some(new_year) = NaiveDate::from_ymd_opt(last.date.year(), 1, 1) else {
            return Ok(statistics);
        };
        statistics.target_working_days = count_workdays(new_year, last.date);

        let mut averages = Averages::default();
        for record in &records {
            statistics.count.add(record.absence);

            let rules = record.absence.rules();
            if rules.reduces_target && is_weekday(record.date) {
                statistics.target_working_days -= 1;
            }
            match rules.credit {
                Credit::Worked => statistics.working_hours += record.duration(),
                Credit::TargetHours => statistics.working_hours += target,
                Credit::Nothing => {}
            }
            averages.add(record);
        }

        statistics.target_working_hours =
            Duration::seconds(target.num_seconds() * statistics.target_working_days);
        statistics.flextime = statistics.working_hours - statistics.target_working_hours;

        let taken = i64::try_from(statistics.count.vacation).unwrap_or(i64::MAX);
        statistics.remaining_vacation_days = i64::from(vacation_days) - taken;

        statistics.tracked_days = averages.days;
        statistics.avg_begin = averages.begin();
        statistics.avg_end = averages.end();
        statistics.avg_pause = averages.pause();

        tracing::debug!(
            records = records.len(),
            target_days = statistics.target_working_days,
            "collected statistics"
        );
        Ok(statistics)
    }
}

/// Running sums for the average begin, end and pause.
#[derive(Debug, Default)]
struct Averages {
    days: usize,
    begin: i64,
    end: i64,
    pause: i64,
}

impl Averages {
    fn add(&mut self, record: &DayRecord) {
        let (Some(begin), Some(end)) = (record.begin, record.end) else {
            return;
        };
        self.days += 1;
        self.begin += i64::from(begin.num_seconds_from_midnight());
        self.end += i64::from(end.num_seconds_from_midnight());
        self.pause += record.pause.num_seconds();
    }

    fn mean(&self, sum: i64) -> Option<i64> {
        let days = i64::try_from(self.days).ok().filter(|days| *days > 0)?;
        Some(sum / days)
    }

    fn time_of_day(&self, sum: i64) -> Option<NaiveTime> {
        let seconds = u32::try_from(self.mean(sum)?).ok()?;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
    }

    fn begin(&self) -> Option<NaiveTime> {
        self.time_of_day(self.begin)
    }

    fn end(&self) -> Option<NaiveTime> {
        self.time_of_day(self.end)
    }

    fn pause(&self) -> Option<Duration> {
        self.mean(self.pause).map(Duration::seconds)
    }
}
