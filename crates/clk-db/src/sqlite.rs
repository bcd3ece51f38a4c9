//! SQLite record store.

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use clk_core::{DayRecord, RecordStore, StoreError};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::DbError;
use crate::row::{StoredDay, key};

/// Database connection wrapper.
///
/// See the [crate documentation](crate) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- One row per calendar day
            -- date: ISO 8601 date (e.g., '2022-01-10')
            -- absence: numeric absence code
            -- start_time/end_time: 'HH:MM:SS' or NULL, pause: 'HH:MM:SS'
            CREATE TABLE IF NOT EXISTS days (
                date TEXT PRIMARY KEY,
                year INTEGER NOT NULL,
                month INTEGER NOT NULL,
                absence INTEGER NOT NULL DEFAULT 0,
                start_time TEXT,
                end_time TEXT,
                pause TEXT NOT NULL DEFAULT '00:00:00'
            );

            CREATE INDEX IF NOT EXISTS idx_days_year_month ON days(year, month);
            ",
        )?;
        Ok(())
    }

    /// Loads the day stored for `date`.
    pub fn get_day(&self, date: NaiveDate) -> Result<Option<DayRecord>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT date, absence, start_time, end_time, pause FROM days WHERE date = ?",
                [key(date)],
                read_row,
            )
            .optional()?;
        row.map(|(id, stored)| stored.into_record(&id)).transpose()
    }

    /// Inserts or replaces the day of `record.date`.
    pub fn upsert_day(&mut self, record: &DayRecord) -> Result<(), DbError> {
        let stored = StoredDay::from(record);
        self.conn.execute(
            "
            INSERT INTO days (date, year, month, absence, start_time, end_time, pause)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(date) DO UPDATE SET
                absence = excluded.absence,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                pause = excluded.pause
            ",
            params![
                key(record.date),
                record.date.year(),
                record.date.month(),
                stored.absence,
                stored.begin,
                stored.end,
                stored.pause,
            ],
        )?;
        Ok(())
    }

    /// Deletes the day of `date`. Returns whether a row was deleted.
    pub fn delete_day(&mut self, date: NaiveDate) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM days WHERE date = ?", [key(date)])?;
        Ok(deleted > 0)
    }

    /// Lists the days of a month ordered by date.
    pub fn days_in_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date, absence, start_time, end_time, pause
            FROM days
            WHERE year = ? AND month = ?
            ORDER BY date ASC
            ",
        )?;
        let rows = stmt.query_map(params![year, month], read_row)?;
        let mut days = Vec::new();
        for row in rows {
            let (id, stored) = row?;
            days.push(stored.into_record(&id)?);
        }
        Ok(days)
    }

    /// Lists the days of `date`'s year up to and including `date`.
    pub fn days_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT date, absence, start_time, end_time, pause
            FROM days
            WHERE year = ? AND date <= ?
            ORDER BY date ASC
            ",
        )?;
        let rows = stmt.query_map(params![date.year(), key(date)], read_row)?;
        let mut days = Vec::new();
        for row in rows {
            let (id, stored) = row?;
            days.push(stored.into_record(&id)?);
        }
        Ok(days)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<(String, StoredDay)> {
    Ok((
        row.get(0)?,
        StoredDay {
            absence: row.get(1)?,
            begin: row.get(2)?,
            end: row.get(3)?,
            pause: row.get(4)?,
        },
    ))
}

impl RecordStore for Database {
    fn load(&self, date: NaiveDate) -> Result<Option<DayRecord>, StoreError> {
        Ok(self.get_day(date)?)
    }

    fn store(&mut self, record: &DayRecord) -> Result<(), StoreError> {
        Ok(self.upsert_day(record)?)
    }

    fn remove(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.delete_day(date)?)
    }

    fn load_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, StoreError> {
        Ok(self.days_in_month(month, year)?)
    }

    fn all_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
        Ok(self.days_until(date)?)
    }
}
