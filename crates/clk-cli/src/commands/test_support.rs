//! Fixtures shared by the command tests.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clk_core::{FixedClock, MemoryStore, Settings, Tracker, Work};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn at(day: NaiveDate, h: u32, m: u32, s: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, s).unwrap()
}

/// 8h days, 30 minutes default pause, 30 vacation days.
pub fn settings() -> Settings {
    Settings {
        work: Work {
            duration: Some(Duration::hours(8)),
            pause_time: Some(Duration::minutes(30)),
            vacation_days: Some(30),
        },
        ..Settings::default()
    }
}

pub fn tracker_at(now: NaiveDateTime) -> Tracker<MemoryStore, FixedClock> {
    Tracker::with_clock(settings(), MemoryStore::new(), FixedClock(now))
}

pub fn output(buffer: Vec<u8>) -> String {
    String::from_utf8(buffer).unwrap()
}
