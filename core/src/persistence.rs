//! Persistence adapter contract for container slices.
//!
//! Containers keep their state in memory and write a *slice* of it (the
//! subset that must survive a restart) to a key-value byte store after each
//! mutation. On construction the slice is read back once to hydrate the
//! initial state.
//!
//! # Wire Format
//!
//! Slices are stored as UTF-8 JSON wrapped in a versioned envelope:
//!
//! ```text
//! {"state": { ...slice fields... }, "version": 0}
//! ```
//!
//! # Dyn Compatibility
//!
//! `PersistenceAdapter` uses explicit `Pin<Box<dyn Future>>` returns instead
//! of `async fn` so it can be held as `Arc<dyn PersistenceAdapter>` inside
//! container environments and captured by effects.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Current envelope version written by [`save_slice`].
pub const SLICE_VERSION: u32 = 0;

/// Boxed future returned by adapter operations.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PersistenceError>> + Send + 'a>>;

/// Errors that can occur during persistence operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Slice could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage backend is not available.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Asynchronous key-value byte storage.
///
/// Keys are process-wide constants owned by each container. Avoiding key
/// collisions with other users of the same adapter is the adapter owner's
/// responsibility.
pub trait PersistenceAdapter: Send + Sync {
    /// Read the bytes stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write<'a>(&'a self, key: &'a str, bytes: Vec<u8>) -> StorageFuture<'a, ()>;

    /// Remove the value stored under `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove<'a>(&'a self, key: &'a str) -> StorageFuture<'a, ()>;
}

/// Versioned envelope around a persisted slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSlice<T> {
    /// The slice itself
    pub state: T,
    /// Envelope version
    pub version: u32,
}

impl<T> PersistedSlice<T> {
    /// Wrap a slice in an envelope at the current version
    #[must_use]
    pub const fn new(state: T) -> Self {
        Self {
            state,
            version: SLICE_VERSION,
        }
    }
}

/// Encode a slice into its stored byte form.
///
/// # Errors
///
/// Returns [`PersistenceError::Serialization`] if the slice cannot be encoded.
pub fn encode_slice<T: Serialize>(slice: &T) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec(&PersistedSlice::new(slice))
        .map_err(|e| PersistenceError::Serialization(e.to_string()))
}

/// Decode a slice from its stored byte form.
///
/// # Errors
///
/// Returns [`PersistenceError::Serialization`] if the bytes are not a valid envelope.
pub fn decode_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PersistenceError> {
    serde_json::from_slice::<PersistedSlice<T>>(bytes)
        .map(|envelope| envelope.state)
        .map_err(|e| PersistenceError::Serialization(e.to_string()))
}

/// Serialize `slice` and write it under `key`.
///
/// # Errors
///
/// Returns an error if encoding or the underlying write fails.
pub async fn save_slice<T: Serialize + Sync>(
    adapter: &dyn PersistenceAdapter,
    key: &str,
    slice: &T,
) -> Result<(), PersistenceError> {
    let bytes = encode_slice(slice)?;
    adapter.write(key, bytes).await
}

/// Read and deserialize the slice stored under `key`.
///
/// Returns `Ok(None)` when nothing has been stored yet.
///
/// # Errors
///
/// Returns an error if the read fails or the stored bytes cannot be decoded.
pub async fn load_slice<T: DeserializeOwned>(
    adapter: &dyn PersistenceAdapter,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    match adapter.read(key).await? {
        Some(bytes) => decode_slice(&bytes).map(Some),
        None => Ok(None),
    }
}
