//! Error types for authentication operations.

use crate::constants::messages;
use thiserror::Error;
use todoapp_runtime::StoreError;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the authentication container.
///
/// Only [`AuthError::Validation`] and [`AuthError::Store`] are ever returned
/// to callers of the container. Provider failures are caught inside the
/// operation and land in `AuthState::error` as a classified message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Caller-side input rejected before any state change.
    #[error("{0}")]
    Validation(String),

    /// Sign-in against an address whose verification is still pending.
    ///
    /// The display text matches the backend wording so that
    /// [`classify_auth_error`] maps it to the verification prompt.
    #[error("Email not confirmed")]
    VerificationRequired {
        /// Address awaiting verification
        email: String,
    },

    /// Raw failure reported by the auth provider.
    #[error("{0}")]
    Provider(String),

    /// The container's store rejected the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// User-facing message for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// # use todoapp_auth::AuthError;
    /// let error = AuthError::Provider("Invalid login credentials".to_string());
    /// assert_eq!(
    ///     error.user_message(),
    ///     "Invalid email or password. Please check your credentials."
    /// );
    /// ```
    #[must_use]
    pub fn user_message(&self) -> String {
        classify_auth_error(&self.to_string())
    }

    /// Returns `true` if this error is due to invalid caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Known backend phrases and the message shown for each, checked in order.
const RULES: &[(&str, &str)] = &[
    ("Invalid login credentials", messages::INVALID_CREDENTIALS),
    ("Email not confirmed", messages::VERIFY_EMAIL),
    ("User already registered", messages::ALREADY_REGISTERED),
    ("Password should be at least", messages::PASSWORD_TOO_SHORT),
    ("Unable to validate email address", messages::INVALID_EMAIL),
    ("Email rate limit exceeded", messages::RATE_LIMITED),
    ("Token has expired", messages::TOKEN_EXPIRED),
    ("Invalid token", messages::TOKEN_INVALID),
    ("Network request failed", messages::NETWORK),
];

/// Map a raw failure description to a user-facing message.
///
/// Matching is by substring; the first matching rule wins. Descriptions that
/// match no rule are returned verbatim, and an empty description yields a
/// generic message.
#[must_use]
pub fn classify_auth_error(raw: &str) -> String {
    if raw.trim().is_empty() {
        return messages::UNEXPECTED.to_string();
    }

    RULES
        .iter()
        .find(|(needle, _)| raw.contains(needle))
        .map_or_else(|| raw.to_string(), |(_, message)| (*message).to_string())
}
