//! Conversion between [`DayRecord`] and its stored layout.

use chrono::{NaiveDate, NaiveTime};
use clk_core::time::{format_clock_duration, format_time, parse_duration};
use clk_core::{AbsenceKind, DayRecord};
use serde::{Deserialize, Serialize};

use crate::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

/// One day as persisted, without its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDay {
    pub absence: u8,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub pause: String,
}

impl From<&DayRecord> for StoredDay {
    fn from(record: &DayRecord) -> Self {
        Self {
            absence: record.absence.code(),
            begin: record.begin.map(format_time),
            end: record.end.map(format_time),
            pause: format_clock_duration(record.pause),
        }
    }
}

impl StoredDay {
    /// Decodes the stored values of the day with key `id`.
    pub fn into_record(self, id: &str) -> Result<DayRecord, DbError> {
        let invalid = |message: String| DbError::InvalidRow {
            id: id.to_string(),
            message,
        };

        let date = parse_key(id)?;
        let absence = AbsenceKind::from_code(self.absence)
            .ok_or_else(|| invalid(format!("unknown absence code {}", self.absence)))?;
        let begin = self
            .begin
            .as_deref()
            .map(parse_stored_time)
            .transpose()
            .map_err(&invalid)?;
        let end = self
            .end
            .as_deref()
            .map(parse_stored_time)
            .transpose()
            .map_err(&invalid)?;
        let pause = parse_duration(&self.pause).map_err(|err| invalid(err.to_string()))?;

        Ok(DayRecord {
            date,
            absence,
            begin,
            end,
            pause,
        })
    }
}

/// Storage key of a date.
pub fn key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_key(id: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(id, DATE_FORMAT).map_err(|err| DbError::InvalidRow {
        id: id.to_string(),
        message: format!("invalid date key: {err}"),
    })
}

fn parse_stored_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|err| format!("invalid time {value}: {err}"))
}
