//! Todo container configuration.

use crate::constants::latency;
use std::time::Duration;
use todoapp_runtime::OperationOrdering;

/// Simulated latency per remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoLatencies {
    /// Creating a todo.
    pub add: Duration,
    /// Updating or toggling a todo.
    pub update: Duration,
    /// Deleting a todo.
    pub delete: Duration,
}

impl TodoLatencies {
    /// The same latency for every write.
    #[must_use]
    pub const fn uniform(latency: Duration) -> Self {
        Self {
            add: latency,
            update: latency,
            delete: latency,
        }
    }

    /// Every latency multiplied by `factor`.
    ///
    /// Negative or non-finite factors are treated as zero. Overflowing
    /// products saturate at [`Duration::MAX`].
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        if !(factor.is_finite() && factor > 0.0) {
            return Self::uniform(Duration::ZERO);
        }
        self.checked_scaled(factor)
            .unwrap_or_else(|| Self::uniform(Duration::MAX))
    }

    /// Like [`scaled`](Self::scaled), but `None` for a negative or NaN
    /// factor or a product that does not fit in a [`Duration`].
    #[must_use]
    pub fn checked_scaled(self, factor: f64) -> Option<Self> {
        let scale = |d: Duration| Duration::try_from_secs_f64(d.as_secs_f64() * factor).ok();
        Some(Self {
            add: scale(self.add)?,
            update: scale(self.update)?,
            delete: scale(self.delete)?,
        })
    }
}

impl Default for TodoLatencies {
    fn default() -> Self {
        Self {
            add: latency::ADD,
            update: latency::UPDATE,
            delete: latency::DELETE,
        }
    }
}

/// Todo container configuration.
#[derive(Debug, Clone, Default)]
pub struct TodoConfig {
    /// Simulated write latencies.
    ///
    /// Default: 500 ms add, 300 ms update and delete
    pub latencies: TodoLatencies,

    /// How overlapping operations are admitted.
    ///
    /// Default: serialized
    pub ordering: OperationOrdering,
}

impl TodoConfig {
    /// Create configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set write latencies.
    #[must_use]
    pub const fn with_latencies(mut self, latencies: TodoLatencies) -> Self {
        self.latencies = latencies;
        self
    }

    /// Set operation ordering.
    #[must_use]
    pub const fn with_ordering(mut self, ordering: OperationOrdering) -> Self {
        self.ordering = ordering;
        self
    }
}
