//! In-memory store.

use super::{KeyValueStore, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument};

/// In-memory key-value store.
///
/// Clones share the same map, so a test can hand one handle to a session and
/// keep another to inspect what was written. [`MemoryStore::set_available`]
/// simulates storage that cannot be reached.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    unavailable: Rc<Cell<bool>>,
}

impl MemoryStore {
    /// Creates an empty, available store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call succeed (`true`) or fail (`false`).
    #[instrument(skip(self))]
    pub fn set_available(&self, available: bool) {
        self.unavailable.set(!available);
    }

    /// Returns a copy of the raw value under `key`, bypassing availability.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Writes a raw value, bypassing availability.
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.values.borrow_mut().insert(key.to_string(), value.into());
    }

    #[track_caller]
    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.get() {
            Err(StoreError::new("memory store marked unavailable"))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        debug!("Value stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
