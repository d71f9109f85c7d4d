//! Per-container operation ordering.
//!
//! Each container operation starts with a reduction, suspends on its effect
//! and finishes when the completion action is reduced. With
//! [`OperationOrdering::Concurrent`] nothing stops a second operation from
//! starting while the first is suspended; completions then race and the last
//! write wins. [`OperationOrdering::Serialized`] admits one operation at a
//! time so completion order always equals call order.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// How a container admits overlapping operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationOrdering {
    /// One operation at a time, in call order
    #[default]
    Serialized,
    /// Operations overlap; completion order follows effect latency
    Concurrent,
}

/// Admission gate shared by all operations of one container
#[derive(Debug, Clone)]
pub struct OperationGate {
    ordering: OperationOrdering,
    lock: Arc<Mutex<()>>,
}

/// Proof of admission; the next serialized operation starts when this drops
#[derive(Debug)]
pub struct GatePass {
    _guard: Option<OwnedMutexGuard<()>>,
}

impl OperationGate {
    /// Create a gate with the given ordering
    #[must_use]
    pub fn new(ordering: OperationOrdering) -> Self {
        Self {
            ordering,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// The ordering this gate enforces
    #[must_use]
    pub const fn ordering(&self) -> OperationOrdering {
        self.ordering
    }

    /// Wait for admission
    pub async fn enter(&self) -> GatePass {
        let guard = match self.ordering {
            OperationOrdering::Serialized => Some(Arc::clone(&self.lock).lock_owned().await),
            OperationOrdering::Concurrent => None,
        };
        GatePass { _guard: guard }
    }
}

impl Default for OperationGate {
    fn default() -> Self {
        Self::new(OperationOrdering::default())
    }
}
