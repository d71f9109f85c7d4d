//! Todo actions.
//!
//! Commands describe what the caller asked for; events report the outcome
//! of the simulated remote write. Every command that reaches the gateway
//! feeds exactly one event back.

use crate::state::{NewTodo, TodoId, TodoPatch};

/// Todo action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Create a todo at the end of the list.
    Add {
        /// What to create.
        draft: NewTodo,
    },

    /// Merge `patch` into the todo with `id`.
    Update {
        /// Target todo.
        id: TodoId,
        /// Fields to change.
        patch: TodoPatch,
    },

    /// Remove the todo with `id`.
    Delete {
        /// Target todo.
        id: TodoId,
    },

    /// Flip the completion flag of the todo with `id`.
    Toggle {
        /// Target todo.
        id: TodoId,
    },

    /// Clear the error field.
    ClearError,

    /// Overwrite the loading flag.
    SetLoading {
        /// New value.
        loading: bool,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Gateway accepted the new todo.
    Added {
        /// What to create.
        draft: NewTodo,
    },

    /// Gateway accepted the update.
    Updated {
        /// Target todo.
        id: TodoId,
        /// Fields to change.
        patch: TodoPatch,
    },

    /// Gateway accepted the deletion.
    Deleted {
        /// Target todo.
        id: TodoId,
    },

    /// The remote write failed.
    Failed {
        /// User-facing message.
        message: String,
    },
}
