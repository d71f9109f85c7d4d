//! # TodoApp Testing
//!
//! Testing utilities and helpers for the TodoApp state containers.
//!
//! This crate provides:
//! - Deterministic clocks
//! - In-memory and failure-injecting persistence adapters
//! - A Given-When-Then builder for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todoapp_testing::{InMemoryStorage, test_clock};
//! use todoapp_runtime::Store;
//!
//! #[tokio::test]
//! async fn adds_a_todo() {
//!     let storage = Arc::new(InMemoryStorage::new());
//!     let env = TodoEnvironment::new(gateway, Arc::new(test_clock()), storage);
//!     let store = Store::new(TodoState::default(), TodoReducer::new(), env);
//!
//!     store.send_and_wait(TodoAction::Add { draft }).await.unwrap();
//!     assert_eq!(store.state(TodoState::count).await, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use todoapp_core::environment::Clock;


/// Persistence adapters for tests
pub mod storage;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use todoapp_testing::mocks::FixedClock;
    /// use todoapp_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading
    ///
    /// The first call returns `start`, the next `start + step`, and so on.
    ///
    /// # Example
    ///
    /// ```
    /// use todoapp_testing::mocks::SteppingClock;
    /// use todoapp_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, Duration::seconds(1));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + Duration::seconds(1));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step: chrono::Duration,
        ticks: AtomicI64,
    }

    impl SteppingClock {
        /// Create a clock starting at `start` that advances by `step` per reading
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                start,
                step,
                ticks: AtomicI64::new(0),
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
            let offset = self.step.checked_mul(i32::try_from(tick).unwrap_or(i32::MAX));
            self.start + offset.unwrap_or(chrono::TimeDelta::MAX)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_epoch())
    }

    /// Create a stepping clock for tests starting at 2025-01-01 00:00:00 UTC,
    /// advancing one second per reading
    #[must_use]
    pub fn stepping_test_clock() -> SteppingClock {
        SteppingClock::new(test_epoch(), chrono::Duration::seconds(1))
    }

    #[allow(clippy::expect_used)]
    fn test_epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, SteppingClock, stepping_test_clock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
pub use storage::{FailingStorage, InMemoryStorage};
