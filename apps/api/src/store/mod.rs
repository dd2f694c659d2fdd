//! Record Store — rows of the "jobs" and "candidates" sheets of a spreadsheet.
//!
//! Workflows only see the `RecordStore` trait. The Google Sheets backend lives
//! in `sheets`; tests use the in-memory store in `memory`.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::SheetRow;

pub mod auth;
#[cfg(test)]
pub mod memory;
pub mod sheets;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store '{0}' was not found or is not shared with the service account")]
    NotFoundOrUnshared(String),

    #[error("Sheet '{0}' does not exist in the store")]
    SheetNotFound(String),

    #[error("Store authentication failed: {0}")]
    Auth(String),

    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid store request: {0}")]
    InvalidRequest(String),

    #[error("Sheet '{sheet}' has {found} columns, expected {expected}")]
    SchemaMismatch {
        sheet: String,
        found: usize,
        expected: usize,
    },
}

/// An opened store. Obtained from `RecordStore::open_store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHandle {
    pub id: String,
    pub name: String,
}

/// One data row keyed by the sheet's header names, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Pairs `row` with `header`. Short rows are padded with empty values and
    /// cells beyond the header are dropped, so columns never shift.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    /// A typed row keyed by its schema's column names, whatever the sheet's
    /// own header says.
    pub fn from_typed<T: SheetRow>(row: &T) -> Self {
        let header: Vec<String> = T::COLUMNS.iter().map(|c| c.to_string()).collect();
        Self::from_row(&header, &row.to_row())
    }

    /// Decodes the record positionally into a typed row.
    pub fn decode<T: SheetRow>(&self) -> T {
        let values: Vec<String> = self.values().map(String::from).collect();
        T::from_row(&values)
    }
}

/// Splits raw sheet rows into records. The first row is the header.
pub fn records_from_rows(rows: &[Vec<String>]) -> Vec<Record> {
    match rows.split_first() {
        Some((header, data)) => data
            .iter()
            .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
            .map(|row| Record::from_row(header, row))
            .collect(),
        None => Vec::new(),
    }
}

/// The spreadsheet-backed store. Implementations must keep row order.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Looks a store up by name. Fails with `NotFoundOrUnshared` when it does
    /// not exist or the service account has no access to it.
    async fn open_store(&self, name: &str) -> Result<StoreHandle, StoreError>;

    /// All rows of a sheet, header first. An empty sheet yields no rows.
    async fn read_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
    ) -> Result<Vec<Vec<String>>, StoreError>;

    /// Appends rows after the last non-empty row of the sheet in one request:
    /// either every row is written or none is.
    async fn append_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError>;

    /// Data rows of a sheet keyed by the header row.
    async fn read_sheet(
        &self,
        handle: &StoreHandle,
        sheet: &str,
    ) -> Result<Vec<Record>, StoreError> {
        let rows = self.read_rows(handle, sheet).await?;
        let records = records_from_rows(&rows);
        debug!("Read {} records from sheet '{}'", records.len(), sheet);
        Ok(records)
    }
}

/// Appends a typed row. An empty sheet gets the header in the same append.
///
/// Refuses to write into a sheet whose header width differs from the schema.
pub async fn append_typed<T: SheetRow + Sync>(
    store: &dyn RecordStore,
    handle: &StoreHandle,
    sheet: &str,
    row: &T,
) -> Result<Vec<String>, StoreError> {
    let existing = store.read_rows(handle, sheet).await?;
    let values = row.to_row();

    let mut rows = Vec::with_capacity(2);
    match existing.first() {
        None => {
            rows.push(T::COLUMNS.iter().map(|c| c.to_string()).collect());
        }
        Some(header) => {
            let found = header.iter().filter(|c| !c.trim().is_empty()).count();
            if found != T::COLUMNS.len() {
                return Err(StoreError::SchemaMismatch {
                    sheet: sheet.to_string(),
                    found,
                    expected: T::COLUMNS.len(),
                });
            }
            if header.iter().zip(T::COLUMNS).any(|(have, want)| have != want) {
                warn!(
                    "Sheet '{}' header {:?} differs from schema {:?}; writing positionally",
                    sheet,
                    header,
                    T::COLUMNS
                );
            }
        }
    }

    rows.push(values.clone());
    store.append_rows(handle, sheet, &rows).await?;
    Ok(values)
}
