//! Error types for todo operations.

use thiserror::Error;
use todoapp_runtime::StoreError;

/// Result type alias for todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Reported when a todo title is blank.
pub const TITLE_REQUIRED: &str = "Please enter a title";

/// Error taxonomy for the todo container.
///
/// The `*Failed` variants describe a rejected remote write. Containers catch
/// them and store their display text in `TodoState::error`; they are never
/// returned to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Caller-side input rejected before any state change.
    #[error("{0}")]
    Validation(String),

    /// Creating a todo failed.
    #[error("Failed to add todo")]
    AddFailed,

    /// Updating or toggling a todo failed.
    #[error("Failed to update todo")]
    UpdateFailed,

    /// Deleting a todo failed.
    #[error("Failed to delete todo")]
    DeleteFailed,

    /// A todo was requested for the current user while nobody is signed in.
    #[error("Sign in to manage your todos")]
    NotSignedIn,

    /// The container's store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TodoError {
    /// Returns `true` if this error is due to invalid caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for a rejected remote write.
    #[must_use]
    pub const fn is_operation_failure(&self) -> bool {
        matches!(self, Self::AddFailed | Self::UpdateFailed | Self::DeleteFailed)
    }
}

/// Reject blank titles.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] if `title` is empty after trimming.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(TodoError::Validation(TITLE_REQUIRED.to_string()));
    }
    Ok(())
}
