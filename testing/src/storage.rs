//! In-memory persistence adapters.
//!
//! `InMemoryStorage` behaves like a device key-value store and records every
//! write so tests can assert on what a container persisted and how often.
//! `FailingStorage` rejects every operation.
//!
//! Clones of an `InMemoryStorage` share the same entries, so a test can keep
//! one handle and hand another to a container.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use todoapp_core::persistence::{PersistenceAdapter, PersistenceError, StorageFuture, decode_slice};

/// Thread-safe in-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    writes: Arc<Mutex<Vec<String>>>,
    first_write_delay: Arc<Mutex<Option<Duration>>>,
}

impl InMemoryStorage {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `key → bytes`
    #[must_use]
    pub fn with_entry(key: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let storage = Self::new();
        if let Ok(mut entries) = storage.entries.lock() {
            entries.insert(key.to_string(), bytes.into());
        }
        storage
    }

    /// Hold the first write back for `delay` before it lands.
    ///
    /// Later writes are not delayed, so a store that issues writes
    /// concurrently sees them complete out of order.
    #[must_use]
    pub fn delay_first_write(self, delay: Duration) -> Self {
        if let Ok(mut slot) = self.first_write_delay.lock() {
            *slot = Some(delay);
        }
        self
    }

    /// Raw bytes currently stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lock_entries().ok()?.get(key).cloned()
    }

    /// Stored value under `key` decoded as UTF-8 text
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Slice stored under `key`, decoded from its envelope.
    ///
    /// `None` if nothing is stored or the bytes do not decode as `T`.
    #[must_use]
    pub fn slice<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        decode_slice(&self.get(key)?).ok()
    }

    /// Keys written so far, in write order (one entry per write)
    #[must_use]
    pub fn write_log(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    /// Number of writes issued against `key`
    #[must_use]
    pub fn write_count(&self, key: &str) -> usize {
        self.write_log().iter().filter(|k| k.as_str() == key).count()
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, PersistenceError> {
        self.entries
            .lock()
            .map_err(|e| PersistenceError::Io(e.to_string()))
    }
}

impl PersistenceAdapter for InMemoryStorage {
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>> {
        Box::pin(async move { Ok(self.lock_entries()?.get(key).cloned()) })
    }

    fn write<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            let delay = self
                .first_write_delay
                .lock()
                .map_err(|e| PersistenceError::Io(e.to_string()))?
                .take();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.lock_entries()?.insert(key.to_string(), bytes);
            self.writes
                .lock()
                .map_err(|e| PersistenceError::Io(e.to_string()))?
                .push(key.to_string());
            Ok(())
        })
    }

    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async move {
            self.lock_entries()?.remove(key);
            Ok(())
        })
    }
}

/// Adapter whose every operation fails with [`PersistenceError::Unavailable`]
#[derive(Debug, Clone, Default)]
pub struct FailingStorage;

impl FailingStorage {
    /// Create a failing adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PersistenceAdapter for FailingStorage {
    fn read<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>> {
        Box::pin(async { Err(PersistenceError::Unavailable("storage offline".to_string())) })
    }

    fn write<'a>(&'a self, _key: &'a str, _bytes: Vec<u8>) -> StorageFuture<'a, ()> {
        Box::pin(async { Err(PersistenceError::Unavailable("storage offline".to_string())) })
    }

    fn remove<'a>(&'a self, _key: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(async { Err(PersistenceError::Unavailable("storage offline".to_string())) })
    }
}
