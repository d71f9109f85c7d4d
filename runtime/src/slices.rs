//! Ordered slice persistence.
//!
//! A reducer stages a write while the store's state lock is held, so staged
//! sequence numbers follow reduction order. Commits run on independent
//! effect tasks and may start in any order. The writer holds a per-key lock
//! across the adapter write and skips any write older than one it already
//! committed, so storage always ends on the newest staged slice.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use todoapp_core::persistence::{PersistenceAdapter, PersistenceError, encode_slice};
use tokio::sync::Mutex;

/// Result of committing a [`StagedWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The slice was written to storage.
    Written,
    /// A newer slice was already committed; this one was dropped.
    Superseded,
}

struct Inner {
    storage: Arc<dyn PersistenceAdapter>,
    key: &'static str,
    staged: AtomicU64,
    committed: Mutex<u64>,
}

/// Serializes writes of one persisted slice.
///
/// Clones share the same sequence and lock.
#[derive(Clone)]
pub struct SliceWriter {
    inner: Arc<Inner>,
}

impl SliceWriter {
    /// Create a writer for `key` in `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn PersistenceAdapter>, key: &'static str) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                key,
                staged: AtomicU64::new(0),
                committed: Mutex::new(0),
            }),
        }
    }

    /// Storage key this writer owns.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.inner.key
    }

    /// Encode `slice` and reserve the next sequence number for it.
    ///
    /// Call from the reducer so sequence order matches state order.
    #[must_use]
    pub fn stage<T: Serialize>(&self, slice: &T) -> StagedWrite {
        let sequence = self.inner.staged.fetch_add(1, Ordering::SeqCst) + 1;
        StagedWrite {
            writer: self.clone(),
            sequence,
            bytes: encode_slice(slice),
        }
    }
}

impl std::fmt::Debug for SliceWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceWriter")
            .field("key", &self.inner.key)
            .field("staged", &self.inner.staged.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// An encoded slice waiting to be written.
#[derive(Debug)]
pub struct StagedWrite {
    writer: SliceWriter,
    sequence: u64,
    bytes: Result<Vec<u8>, PersistenceError>,
}

impl StagedWrite {
    /// Position of this write in staging order, starting at 1.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Write the slice unless a newer one has already been committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice could not be encoded or the adapter
    /// write failed.
    pub async fn commit(self) -> Result<CommitOutcome, PersistenceError> {
        let bytes = self.bytes?;
        let inner = &self.writer.inner;

        let mut committed = inner.committed.lock().await;
        if *committed >= self.sequence {
            tracing::trace!(key = inner.key, sequence = self.sequence, "Skipping superseded slice");
            return Ok(CommitOutcome::Superseded);
        }
        *committed = self.sequence;
        inner.storage.write(inner.key, bytes).await?;
        Ok(CommitOutcome::Written)
    }
}
