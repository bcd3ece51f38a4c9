//! Tracking engine.
//!
//! Enforces the lifecycle of a day record:
//!
//! ```text
//! Empty -> Started (begin) -> Stopped (begin + end)
//! ```
//!
//! `track` can jump straight to `Stopped` or revisit `Started`, and `notify`
//! turns any record except a holiday into an absence day.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use crate::absence::AbsenceKind;
use crate::clock::{Clock, SystemClock};
use crate::error::{PolicyError, Result, StateError, ValidationError};
use crate::holidays::public_holidays;
use crate::record::DayRecord;
use crate::settings::Settings;
use crate::store::RecordStore;
use crate::time::{
    days, floor_quarter, format_time, is_weekday, round_end_quarter, round_start_quarter,
    truncate_subsec, weekdays,
};

/// Days with a longer span get the default pause.
const PAUSE_THRESHOLD_HOURS: i64 = 6;

/// Records working hours through a [`RecordStore`].
#[derive(Debug)]
pub struct Tracker<S, C = SystemClock> {
    settings: Settings,
    store: S,
    clock: C,
}

impl<S: RecordStore> Tracker<S> {
    /// Creates a tracker reading the local wall clock.
    pub const fn new(settings: Settings, store: S) -> Self {
        Self::with_clock(settings, store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> Tracker<S, C> {
    pub const fn with_clock(settings: Settings, store: S, clock: C) -> Self {
        Self {
            settings,
            store,
            clock,
        }
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Starts tracking today at the current time.
    ///
    /// Calling it again on the same day returns the existing record unchanged.
    pub fn start(&mut self) -> Result<DayRecord> {
        let now = self.clock.now();
        let today = now.date();
        self.check_rest_day(today)?;

        if let Some(record) = self.store.load(today)? {
            self.check_holiday(&record)?;
            tracing::debug!(%today, "tracking already started, keeping existing record");
            return Ok(record);
        }

        let begin = if self.settings.behavior.round_to_quarter {
            same_day(now.time(), round_start_quarter(now.time()))
        } else {
            truncate_subsec(now.time())
        };

        let record = DayRecord::worked(today, begin, None, Duration::zero());
        self.store.store(&record)?;
        tracing::info!(%today, begin = %format_time(begin), "started tracking");
        Ok(record)
    }

    /// Stops tracking today at the current time.
    ///
    /// Only a strictly later end time replaces an existing one.
    pub fn stop(&mut self) -> Result<DayRecord> {
        let now = self.clock.now();
        let today = now.date();

        let Some(mut record) = self.store.load(today)? else {
            return Err(StateError::NotStarted { date: today }.into());
        };
        self.check_rest_day(today)?;
        self.check_holiday(&record)?;
        if record.begin.is_none() {
            return Err(StateError::NotStarted { date: today }.into());
        }

        let end = if self.settings.behavior.round_to_quarter {
            same_day(now.time(), round_end_quarter(now.time()))
        } else {
            truncate_subsec(now.time())
        };

        if record.end.is_some_and(|existing| end <= existing) {
            tracing::debug!(%today, end = %format_time(end), "stop is not later than stored end");
            return Ok(record);
        }

        record.end = Some(end);
        self.apply_default_pause(&mut record);
        self.store.store(&record)?;
        tracing::info!(%today, end = %format_time(end), "stopped tracking");
        Ok(record)
    }

    /// Manually creates or updates the workday record of `date`.
    ///
    /// Given values replace stored ones. An explicit zero pause keeps the
    /// stored pause. The resulting record must have a start time, otherwise
    /// nothing is written.
    pub fn track(
        &mut self,
        date: NaiveDate,
        begin: Option<NaiveTime>,
        end: Option<NaiveTime>,
        pause: Option<Duration>,
    ) -> Result<DayRecord> {
        let mut record = match self.store.load(date)? {
            Some(existing) if existing.is_absence_day() => {
                tracing::debug!(%date, absence = %existing.absence, "replacing absence day with workday");
                DayRecord::new(date)
            }
            Some(existing) => existing,
            None => DayRecord::new(date),
        };

        if begin.is_some() {
            record.begin = begin;
        }
        if end.is_some() {
            record.end = end;
        }
        match pause {
            Some(pause) if !pause.is_zero() => record.pause = pause,
            Some(_) => tracing::debug!(%date, "zero pause given, keeping stored pause"),
            None => {}
        }

        if record.begin.is_none() {
            return Err(ValidationError::MissingBegin { date }.into());
        }

        self.apply_default_pause(&mut record);
        if record.span().is_some_and(|span| span < Duration::zero()) {
            tracing::warn!(%date, "end time lies before start time");
        }

        self.store.store(&record)?;
        tracing::info!(%record, "tracked day");
        Ok(record)
    }

    /// Deletes the record of `date`, returning it if there was one.
    pub fn remove(&mut self, date: NaiveDate) -> Result<Option<DayRecord>> {
        let Some(record) = self.store.load(date)? else {
            tracing::debug!(%date, "nothing to remove");
            return Ok(None);
        };
        self.store.remove(date)?;
        tracing::info!(%date, "removed record");
        Ok(Some(record))
    }

    /// Deletes every record in `start..=end`.
    pub fn remove_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DayRecord>> {
        if start > end {
            return Err(ValidationError::InvalidRange { start, end }.into());
        }
        let mut removed = Vec::new();
        for date in days(start, end) {
            if let Some(record) = self.remove(date)? {
                removed.push(record);
            }
        }
        Ok(removed)
    }

    /// Marks every weekday in `start..=end` as an absence of `kind`.
    ///
    /// Holidays are left untouched. Returns the written records in date order.
    pub fn notify(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        kind: AbsenceKind,
    ) -> Result<Vec<DayRecord>> {
        if start > end {
            return Err(ValidationError::InvalidRange { start, end }.into());
        }

        let mut touched = Vec::new();
        for date in weekdays(start, end) {
            if let Some(existing) = self.store.load(date)? {
                if existing.absence.is_protected() {
                    tracing::debug!(%date, absence = %existing.absence, "skipping protected day");
                    continue;
                }
            }
            let record = DayRecord::absence(date, kind);
            self.store.store(&record)?;
            touched.push(record);
        }
        tracing::info!(%start, %end, %kind, days = touched.len(), "notified absence");
        Ok(touched)
    }

    /// Records the public holidays of `year`.
    ///
    /// Dates that already have a record keep it. Returns the created records.
    pub fn mark_holidays(&mut self, year: i32) -> Result<Vec<DayRecord>> {
        let mut created = Vec::new();
        for holiday in public_holidays(year) {
            if self.store.load(holiday.date)?.is_some() {
                tracing::debug!(date = %holiday.date, name = holiday.name, "day already recorded");
                continue;
            }
            let record = DayRecord::absence(holiday.date, AbsenceKind::Holiday);
            self.store.store(&record)?;
            created.push(record);
        }
        tracing::info!(year, days = created.len(), "stored public holidays");
        Ok(created)
    }

    fn check_rest_day(&self, date: NaiveDate) -> Result<(), PolicyError> {
        if is_weekday(date) || self.settings.behavior.auto_track_weekends {
            return Ok(());
        }
        tracing::warn!(%date, "automatic tracking refused on weekend");
        Err(PolicyError::RestDay {
            date,
            weekday: date.weekday(),
        })
    }

    fn check_holiday(&self, record: &DayRecord) -> Result<(), PolicyError> {
        if record.absence != AbsenceKind::Holiday || self.settings.behavior.auto_track_holidays {
            return Ok(());
        }
        tracing::warn!(date = %record.date, "automatic tracking refused on holiday");
        Err(PolicyError::Holiday { date: record.date })
    }

    /// Sets the configured pause on long days that have none.
    fn apply_default_pause(&self, record: &mut DayRecord) {
        if !record.pause.is_zero() {
            return;
        }
        let Some(span) = record.span() else {
            return;
        };
        if span <= Duration::hours(PAUSE_THRESHOLD_HOURS) {
            return;
        }
        match self.settings.work.pause_time {
            Some(pause) => record.pause = pause,
            None => tracing::debug!(date = %record.date, "no default pause configured"),
        }
    }
}

/// Keeps a rounded time on the same day as the raw one.
///
/// Rounding up shortly before midnight would wrap to `00:00`; the current
/// quarter is used instead.
fn same_day(raw: NaiveTime, rounded: NaiveTime) -> NaiveTime {
    if rounded < raw && raw - rounded > Duration::minutes(15) {
        floor_quarter(raw)
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;

    use crate::clock::FixedClock;
    use crate::error::Error;
    use crate::settings::{Behavior, Work};
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, s).unwrap()
    }

    fn settings() -> Settings {
        Settings {
            behavior: Behavior::default(),
            work: Work {
                duration: Some(Duration::hours(8)),
                pause_time: Some(Duration::minutes(30)),
                vacation_days: Some(30),
            },
        }
    }

    fn rounding() -> Settings {
        let mut settings = settings();
        settings.behavior.round_to_quarter = true;
        settings
    }

    /// Monday 2022-01-10.
    fn monday() -> NaiveDate {
        date(2022, 1, 10)
    }

    fn tracker_at(settings: Settings, now: NaiveDateTime) -> Tracker<MemoryStore, FixedClock> {
        Tracker::with_clock(settings, MemoryStore::new(), FixedClock(now))
    }

    #[test]
    fn start_creates_record_with_begin() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 3, 27));

        let record = tracker.start().unwrap();

        assert_eq!(record.date, monday());
        assert_eq!(record.begin, Some(NaiveTime::from_hms_opt(8, 3, 27).unwrap()));
        assert_eq!(record.end, None);
        assert_eq!(tracker.store().load(monday()).unwrap(), Some(record));
    }

    #[test]
    fn start_does_not_update_already_existing_records() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        let first = tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 9, 30, 0));
        let second = tracker.start().unwrap();

        assert_eq!(second.begin, first.begin);
        assert_eq!(tracker.store().load(monday()).unwrap().unwrap().begin, first.begin);
    }

    #[test]
    fn start_rounds_to_quarter_when_enabled() {
        let mut tracker = tracker_at(rounding(), at(monday(), 8, 41, 12));
        assert_eq!(tracker.start().unwrap().begin, Some(time(8, 45)));

        let mut tracker = tracker_at(rounding(), at(monday(), 8, 39, 59));
        assert_eq!(tracker.start().unwrap().begin, Some(time(8, 30)));
    }

    #[test]
    fn start_refuses_weekends_unless_enabled() {
        let saturday = date(2022, 1, 8);
        let mut tracker = tracker_at(settings(), at(saturday, 10, 0, 0));

        let err = tracker.start().unwrap_err();
        assert!(matches!(err, Error::Policy(PolicyError::RestDay { .. })));
        assert!(tracker.store().is_empty());

        let mut allowed = settings();
        allowed.behavior.auto_track_weekends = true;
        let mut tracker = tracker_at(allowed, at(saturday, 10, 0, 0));
        assert!(tracker.start().is_ok());
    }

    #[test]
    fn start_refuses_holidays_unless_enabled() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        tracker
            .store_mut()
            .store(&DayRecord::absence(monday(), AbsenceKind::Holiday))
            .unwrap();

        let err = tracker.start().unwrap_err();
        assert_eq!(
            err.to_string(),
            "2022-01-10 is a holiday and automatic tracking of holidays is disabled"
        );

        let mut allowed = settings();
        allowed.behavior.auto_track_holidays = true;
        let store = tracker.into_store();
        let mut tracker = Tracker::with_clock(allowed, store, FixedClock(at(monday(), 8, 0, 0)));
        let record = tracker.start().unwrap();
        assert_eq!(record.absence, AbsenceKind::Holiday);
    }

    #[test]
    fn stop_requires_start() {
        let mut tracker = tracker_at(settings(), at(monday(), 17, 0, 0));

        let err = tracker.stop().unwrap_err();
        assert!(matches!(
            err,
            Error::State(StateError::NotStarted { date }) if date == monday()
        ));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn stop_on_absence_day_is_not_started() {
        let mut tracker = tracker_at(settings(), at(monday(), 17, 0, 0));
        tracker
            .store_mut()
            .store(&DayRecord::absence(monday(), AbsenceKind::Vacation))
            .unwrap();

        assert!(matches!(tracker.stop().unwrap_err(), Error::State(_)));
    }

    #[test]
    fn stop_sets_end_and_default_pause() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 16, 30, 0));
        let record = tracker.stop().unwrap();

        assert_eq!(record.end, Some(time(16, 30)));
        assert_eq!(record.pause, Duration::minutes(30));
        assert_eq!(record.duration(), Duration::hours(8));
    }

    #[test]
    fn short_days_get_no_default_pause() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 14, 0, 0));
        let record = tracker.stop().unwrap();

        assert_eq!(record.pause, Duration::zero());
        assert_eq!(record.duration(), Duration::hours(6));
    }

    #[test]
    fn missing_default_pause_leaves_zero() {
        let mut unconfigured = settings();
        unconfigured.work.pause_time = None;
        let mut tracker = tracker_at(unconfigured, at(monday(), 8, 0, 0));
        tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 17, 0, 0));
        assert_eq!(tracker.stop().unwrap().pause, Duration::zero());
    }

    #[test]
    fn earlier_stop_is_a_no_op() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        tracker.start().unwrap();
        tracker.clock_mut().set(at(monday(), 17, 0, 0));
        tracker.stop().unwrap();

        tracker.clock_mut().set(at(monday(), 16, 0, 0));
        let record = tracker.stop().unwrap();
        assert_eq!(record.end, Some(time(17, 0)));

        tracker.clock_mut().set(at(monday(), 18, 0, 0));
        let record = tracker.stop().unwrap();
        assert_eq!(record.end, Some(time(18, 0)));
    }

    #[test]
    fn equal_rounded_stop_is_a_no_op() {
        let mut tracker = tracker_at(rounding(), at(monday(), 8, 0, 0));
        tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 16, 36, 0));
        assert_eq!(tracker.stop().unwrap().end, Some(time(16, 45)));

        tracker.clock_mut().set(at(monday(), 16, 40, 0));
        assert_eq!(tracker.stop().unwrap().end, Some(time(16, 45)));
    }

    #[test]
    fn rounding_never_crosses_midnight() {
        let mut allowed = rounding();
        allowed.behavior.auto_track_weekends = true;
        let mut tracker = tracker_at(allowed, at(monday(), 22, 0, 0));
        tracker.start().unwrap();

        tracker.clock_mut().set(at(monday(), 23, 57, 0));
        assert_eq!(tracker.stop().unwrap().end, Some(time(23, 45)));
    }

    #[test]
    fn stop_keeps_manual_pause() {
        let mut tracker = tracker_at(settings(), at(monday(), 8, 0, 0));
        tracker
            .track(monday(), Some(time(8, 0)), None, Some(Duration::minutes(45)))
            .unwrap();

        tracker.clock_mut().set(at(monday(), 17, 0, 0));
        assert_eq!(tracker.stop().unwrap().pause, Duration::minutes(45));
    }

    #[test]
    fn track_manually() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        let record = tracker
            .track(
                monday(),
                Some(time(8, 0)),
                Some(time(16, 30)),
                Some(Duration::minutes(30)),
            )
            .unwrap();

        assert_eq!(record.begin, Some(time(8, 0)));
        assert_eq!(record.end, Some(time(16, 30)));
        assert_eq!(record.pause, Duration::minutes(30));
        assert_eq!(tracker.store().load(monday()).unwrap(), Some(record));
    }

    #[test]
    fn track_applies_default_pause() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        let record = tracker
            .track(monday(), Some(time(8, 0)), Some(time(16, 30)), None)
            .unwrap();

        assert_eq!(record.pause, Duration::minutes(30));
        assert_eq!(record.duration(), Duration::hours(8));
    }

    #[test]
    fn track_updates_single_fields() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        tracker
            .track(
                monday(),
                Some(time(8, 0)),
                Some(time(16, 30)),
                Some(Duration::minutes(30)),
            )
            .unwrap();

        tracker.track(monday(), Some(time(7, 30)), None, None).unwrap();
        tracker.track(monday(), None, Some(time(18, 0)), None).unwrap();
        let record = tracker
            .track(monday(), None, None, Some(Duration::minutes(60)))
            .unwrap();

        assert_eq!(record.begin, Some(time(7, 30)));
        assert_eq!(record.end, Some(time(18, 0)));
        assert_eq!(record.pause, Duration::minutes(60));
    }

    #[test]
    fn track_with_zero_pause_keeps_stored_pause() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        tracker
            .track(
                monday(),
                Some(time(8, 0)),
                Some(time(12, 0)),
                Some(Duration::minutes(15)),
            )
            .unwrap();

        let record = tracker
            .track(monday(), None, None, Some(Duration::zero()))
            .unwrap();
        assert_eq!(record.pause, Duration::minutes(15));
    }

    #[test]
    fn track_without_begin_fails_and_writes_nothing() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));

        let err = tracker.track(monday(), None, None, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingBegin { .. })
        ));

        let err = tracker
            .track(monday(), None, Some(time(17, 0)), None)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn track_turns_absence_into_workday() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        tracker
            .notify(monday(), monday(), AbsenceKind::Flexday)
            .unwrap();

        let record = tracker
            .track(monday(), Some(time(9, 0)), Some(time(12, 0)), None)
            .unwrap();
        assert_eq!(record.absence, AbsenceKind::Workday);
        assert_eq!(record.duration(), Duration::hours(3));
    }

    #[test]
    fn remove_is_a_no_op_when_absent() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        assert_eq!(tracker.remove(monday()).unwrap(), None);

        tracker.track(monday(), Some(time(8, 0)), None, None).unwrap();
        let removed = tracker.remove(monday()).unwrap();
        assert_eq!(removed.map(|record| record.date), Some(monday()));
        assert!(tracker.store().is_empty());
    }

    #[test]
    fn remove_range_returns_removed_records() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        for day in [10, 11, 13] {
            tracker
                .track(date(2022, 1, day), Some(time(8, 0)), None, None)
                .unwrap();
        }

        let removed = tracker
            .remove_range(date(2022, 1, 10), date(2022, 1, 12))
            .unwrap();
        let dates: Vec<_> = removed.iter().map(|record| record.date).collect();
        assert_eq!(dates, vec![date(2022, 1, 10), date(2022, 1, 11)]);
        assert_eq!(tracker.store().len(), 1);

        assert!(tracker
            .remove_range(date(2022, 1, 12), date(2022, 1, 10))
            .is_err());
    }

    #[test]
    fn notify_skips_weekends() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));

        let touched = tracker
            .notify(monday(), date(2022, 1, 17), AbsenceKind::Vacation)
            .unwrap();

        let dates: Vec<_> = touched.iter().map(|record| record.date).collect();
        assert_eq!(
            dates,
            vec![
                date(2022, 1, 10),
                date(2022, 1, 11),
                date(2022, 1, 12),
                date(2022, 1, 13),
                date(2022, 1, 14),
                date(2022, 1, 17),
            ]
        );
        assert_eq!(tracker.store().len(), 6);
        assert!(touched
            .iter()
            .all(|record| record.absence == AbsenceKind::Vacation && record.begin.is_none()));
    }

    #[test]
    fn notify_never_overwrites_holidays() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        let holiday = DayRecord::absence(date(2022, 1, 12), AbsenceKind::Holiday);
        tracker.store_mut().store(&holiday).unwrap();

        let touched = tracker
            .notify(monday(), date(2022, 1, 14), AbsenceKind::Sickness)
            .unwrap();

        assert_eq!(touched.len(), 4);
        assert_eq!(
            tracker.store().load(date(2022, 1, 12)).unwrap(),
            Some(holiday)
        );
    }

    #[test]
    fn notify_replaces_worked_days() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        tracker
            .track(monday(), Some(time(8, 0)), Some(time(16, 0)), None)
            .unwrap();

        tracker
            .notify(monday(), monday(), AbsenceKind::Sickness)
            .unwrap();

        let record = tracker.store().load(monday()).unwrap().unwrap();
        assert_eq!(record, DayRecord::absence(monday(), AbsenceKind::Sickness));
    }

    #[test]
    fn notify_rejects_reversed_range() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        let err = tracker
            .notify(date(2022, 1, 14), monday(), AbsenceKind::Vacation)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn mark_holidays_keeps_existing_records() {
        let mut tracker = tracker_at(settings(), at(monday(), 20, 0, 0));
        let good_friday = date(2022, 4, 15);
        tracker
            .track(good_friday, Some(time(8, 0)), None, None)
            .unwrap();

        let created = tracker.mark_holidays(2022).unwrap();

        assert!(created.iter().all(|record| record.absence == AbsenceKind::Holiday));
        assert!(!created.iter().any(|record| record.date == good_friday));
        assert_eq!(created.len(), public_holidays(2022).len() - 1);
        assert_eq!(
            tracker.store().load(good_friday).unwrap().unwrap().absence,
            AbsenceKind::Workday
        );
    }
}
