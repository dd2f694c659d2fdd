//! In-memory `RecordStore` for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{RecordStore, StoreError, StoreHandle};

type Sheets = HashMap<String, Vec<Vec<String>>>;

#[derive(Default)]
pub struct MemoryStore {
    stores: Mutex<HashMap<String, Sheets>>,
    fail_appends: AtomicBool,
    appends: AtomicUsize,
}

impl MemoryStore {
    pub fn with_store(name: &str) -> Self {
        let store = Self::default();
        store.lock().insert(name.to_string(), HashMap::new());
        store
    }

    /// Replaces a sheet's rows (header first).
    pub fn seed(&self, store: &str, sheet: &str, rows: Vec<Vec<String>>) {
        self.lock()
            .entry(store.to_string())
            .or_default()
            .insert(sheet.to_string(), rows);
    }

    pub fn rows(&self, store: &str, sheet: &str) -> Vec<Vec<String>> {
        self.lock()
            .get(store)
            .and_then(|sheets| sheets.get(sheet))
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every subsequent append fail.
    pub fn fail_appends(&self) {
        self.fail_appends.store(true, Ordering::SeqCst);
    }

    /// Number of append requests received, failed ones included.
    pub fn append_calls(&self) -> usize {
        self.appends.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Sheets>> {
        self.stores.lock().unwrap()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn open_store(&self, name: &str) -> Result<StoreHandle, StoreError> {
        if self.lock().contains_key(name) {
            Ok(StoreHandle {
                id: format!("mem-{name}"),
                name: name.to_string(),
            })
        } else {
            Err(StoreError::NotFoundOrUnshared(name.to_string()))
        }
    }

    async fn read_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
    ) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.rows(&handle.name, sheet))
    }

    async fn append_rows(
        &self,
        handle: &StoreHandle,
        sheet: &str,
        rows: &[Vec<String>],
    ) -> Result<(), StoreError> {
        self.appends.fetch_add(1, Ordering::SeqCst);
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 503,
                message: "append rejected".to_string(),
            });
        }
        self.lock()
            .entry(handle.name.clone())
            .or_default()
            .entry(sheet.to_string())
            .or_default()
            .extend(rows.iter().cloned());
        Ok(())
    }
}
