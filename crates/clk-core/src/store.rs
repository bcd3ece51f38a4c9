//! Record store abstraction.
//!
//! The tracker and the statistics only ever talk to a [`RecordStore`].
//! [`MemoryStore`] keeps everything in a map and backs the tests; durable
//! implementations live in `clk-db`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::error::StoreError;
use crate::record::DayRecord;

/// Persistence of one [`DayRecord`] per calendar date.
pub trait RecordStore {
    /// Loads the record of a date, if any.
    fn load(&self, date: NaiveDate) -> Result<Option<DayRecord>, StoreError>;

    /// Inserts or replaces the record for its date.
    fn store(&mut self, record: &DayRecord) -> Result<(), StoreError>;

    /// Deletes the record of a date. Returns whether something was deleted.
    fn remove(&mut self, date: NaiveDate) -> Result<bool, StoreError>;

    /// All records of a month, sorted by date.
    fn load_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, StoreError>;

    /// All records of `date`'s year up to and including `date`, sorted by date.
    fn all_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn load(&self, date: NaiveDate) -> Result<Option<DayRecord>, StoreError> {
        (**self).load(date)
    }

    fn store(&mut self, record: &DayRecord) -> Result<(), StoreError> {
        (**self).store(record)
    }

    fn remove(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        (**self).remove(date)
    }

    fn load_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, StoreError> {
        (**self).load_month(month, year)
    }

    fn all_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
        (**self).all_until(date)
    }
}

/// In-memory record store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<NaiveDate, DayRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<DayRecord> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = DayRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|record| (record.date, record)).collect(),
        }
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, date: NaiveDate) -> Result<Option<DayRecord>, StoreError> {
        Ok(self.records.get(&date).cloned())
    }

    fn store(&mut self, record: &DayRecord) -> Result<(), StoreError> {
        self.records.insert(record.date, record.clone());
        Ok(())
    }

    fn remove(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        Ok(self.records.remove(&date).is_some())
    }

    fn load_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|record| record.date.year() == year && record.date.month() == month)
            .cloned()
            .collect())
    }

    fn all_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
        Ok(self
            .records
            .values()
            .filter(|record| record.date.year() == date.year() && record.date <= date)
            .cloned()
            .collect())
    }
}
