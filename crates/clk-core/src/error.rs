//! Error taxonomy for tracking and statistics operations.

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

/// Any failure a tracking or statistics operation can report.
#[derive(Debug, Error)]
pub enum Error {
    /// The operation is disallowed by the configured behaviour.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The operation was invoked in an invalid record state.
    #[error(transparent)]
    State(#[from] StateError),

    /// The input or the resulting record is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A setting required by the operation is not configured.
    #[error("setting {section}.{key} is not configured")]
    MissingSetting {
        section: &'static str,
        key: &'static str,
    },
}

impl Error {
    /// Policy refusals are reported as warnings, everything else as errors.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Self::Policy(_))
    }
}

/// Operation refused by the configured behaviour flags.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Automatic tracking is disabled on weekends.
    #[error("automatic tracking is disabled on {weekday} ({date})")]
    RestDay { date: NaiveDate, weekday: Weekday },

    /// Automatic tracking is disabled on public holidays.
    #[error("{date} is a holiday and automatic tracking of holidays is disabled")]
    Holiday { date: NaiveDate },
}

/// Operation invoked in the wrong state of a day record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// `stop` was called before `start` for the day.
    #[error("tracking of {date} has not been started, start must be called before stop")]
    NotStarted { date: NaiveDate },
}

/// Invalid input or a record that would break an invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A workday record must have a start time.
    #[error("start time of {date} cannot be empty")]
    MissingBegin { date: NaiveDate },

    /// Statistics can only be collected within a single year.
    #[error("data set is not from the same year: {first} != {last}")]
    MixedYears { first: i32, last: i32 },

    /// The start of a date range lies after its end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid date: {0} (expected dd.mm.yyyy or yyyy-mm-dd)")]
    InvalidDate(String),

    #[error("invalid time: {0} (expected hh:mm[:ss])")]
    InvalidTime(String),

    #[error("invalid duration: {0} (expected h:mm[:ss])")]
    InvalidDuration(String),

    #[error("invalid absence type: {0} (expected one of W, V, F, S, H)")]
    UnknownAbsence(String),
}

/// Failure of the underlying record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend reported an error.
    #[error("record store failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A stored record could not be decoded.
    #[error("invalid stored record {id}: {message}")]
    Corrupt { id: String, message: String },
}

impl StoreError {
    /// Wraps any backend error.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
