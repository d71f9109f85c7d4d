//! Todo container constants.

use std::time::Duration;

/// Storage key for the persisted todo slice (`{todos}`).
pub const TODO_STORAGE_KEY: &str = "todo-app-a1d925c0-95a2-4003-a3a5-0a52d7b5bfb6-todo-storage";

/// Simulated remote write latencies.
pub mod latency {
    use super::Duration;

    /// Creating a todo.
    pub const ADD: Duration = Duration::from_millis(500);

    /// Updating or toggling a todo.
    pub const UPDATE: Duration = Duration::from_millis(300);

    /// Deleting a todo.
    pub const DELETE: Duration = Duration::from_millis(300);
}
