//! Core domain logic for the work-hour tracker.
//!
//! This crate contains the fundamental types and logic for:
//! - Tracking: starting, stopping and editing day records
//! - Absences: vacation, flex, sick and holiday days with their credit rules
//! - Statistics: worked hours, flextime and vacation balance of a year
//!
//! Persistence goes through the [`RecordStore`] trait; durable stores live in
//! `clk-db`.

mod absence;
pub mod clock;
mod error;
pub mod holidays;
mod record;
mod settings;
mod statistics;
mod store;
pub mod time;
mod tracker;

pub use absence::{AbsenceKind, AbsenceRules, Credit};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, PolicyError, Result, StateError, StoreError, ValidationError};
pub use holidays::{PublicHoliday, public_holidays};
pub use record::{DayRecord, DayState};
pub use settings::{Behavior, SettingValue, Settings, Work};
pub use statistics::{DayCount, StatisticHandler, Statistics};
pub use store::{MemoryStore, RecordStore};
pub use tracker::Tracker;
