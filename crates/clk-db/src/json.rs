//! JSON record store: one document per year in a directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use clk_core::{DayRecord, RecordStore, StoreError};

use crate::DbError;
use crate::row::{StoredDay, key, parse_key};

/// Days of one year keyed by ISO date. Keys sort chronologically.
type YearDocument = BTreeMap<String, StoredDay>;

/// Directory of `<year>.json` documents.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Opens the store in `dir`, creating the directory if necessary.
    pub fn open(dir: &Path) -> Result<Self, DbError> {
        fs::create_dir_all(dir).map_err(|source| DbError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %dir.display(), "opened json store");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn year_path(&self, year: i32) -> PathBuf {
        self.dir.join(format!("{year}.json"))
    }

    /// Reads the document of a year; a missing file is an empty year.
    fn read_year(&self, year: i32) -> Result<YearDocument, DbError> {
        let path = self.year_path(year);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(YearDocument::new()),
            Err(source) => return Err(DbError::Io { path, source }),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn write_year(&self, year: i32, document: &YearDocument) -> Result<(), DbError> {
        let path = self.year_path(year);
        let content = serde_json::to_string_pretty(document)?;
        fs::write(&path, content).map_err(|source| DbError::Io { path, source })
    }

    /// Decodes the entries of a year document that satisfy `keep`.
    fn decode(
        document: YearDocument,
        keep: impl Fn(NaiveDate) -> bool,
    ) -> Result<Vec<DayRecord>, DbError> {
        let mut records = Vec::new();
        for (id, stored) in document {
            if keep(parse_key(&id)?) {
                records.push(stored.into_record(&id)?);
            }
        }
        Ok(records)
    }
}

impl RecordStore for JsonStore {
    fn load(&self, date: NaiveDate) -> Result<Option<DayRecord>, StoreError> {
        let id = key(date);
        let mut document = self.read_year(date.year())?;
        Ok(document
            .remove(&id)
            .map(|stored| stored.into_record(&id))
            .transpose()?)
    }

    fn store(&mut self, record: &DayRecord) -> Result<(), StoreError> {
        let year = record.date.year();
        let mut document = self.read_year(year)?;
        document.insert(key(record.date), StoredDay::from(record));
        Ok(self.write_year(year, &document)?)
    }

    fn remove(&mut self, date: NaiveDate) -> Result<bool, StoreError> {
        let year = date.year();
        let mut document = self.read_year(year)?;
        if document.remove(&key(date)).is_none() {
            return Ok(false);
        }
        self.write_year(year, &document)?;
        Ok(true)
    }

    fn load_month(&self, month: u32, year: i32) -> Result<Vec<DayRecord>, StoreError> {
        let document = self.read_year(year)?;
        Ok(Self::decode(document, |date| date.month() == month)?)
    }

    fn all_until(&self, date: NaiveDate) -> Result<Vec<DayRecord>, StoreError> {
        let document = self.read_year(date.year())?;
        Ok(Self::decode(document, |day| day <= date)?)
    }
}
