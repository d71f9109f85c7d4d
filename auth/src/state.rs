//! Authentication state types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque user identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Stable identifier derived from an email address.
    ///
    /// The same address always yields the same id, so data owned by a user
    /// survives sign-out and sign-in.
    #[must_use]
    pub fn for_email(email: &str) -> Self {
        let normalized = email.trim().to_lowercase();
        Self(Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("mailto:{normalized}").as_bytes()).to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signed-in user. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
}

impl User {
    /// Build a user whose display name is the local part of `email`.
    #[must_use]
    pub fn from_email(id: UserId, email: &str) -> Self {
        let name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            id,
            email: email.to_string(),
            name,
        }
    }
}

/// Active step of the authentication flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Returning user signs in.
    #[default]
    Signin,
    /// New user registers.
    Signup,
    /// Forgotten password.
    Reset,
    /// Waiting for the user to verify their address.
    VerifyEmail,
    /// Processing a verification link.
    ConfirmEmail,
}

impl AuthMode {
    /// Wire name of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Signin => "signin",
            Self::Signup => "signup",
            Self::Reset => "reset",
            Self::VerifyEmail => "verify-email",
            Self::ConfirmEmail => "confirm-email",
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication container state.
///
/// Only `user` and `is_email_verified` survive a restart (see [`PersistedAuth`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Signed-in user, if any.
    pub user: Option<User>,
    /// Current flow step.
    pub mode: AuthMode,
    /// Address a verification or reset email was sent to.
    pub email_pending_verification: Option<String>,
    /// Whether the current address has been verified.
    pub is_email_verified: bool,
    /// An operation is in flight.
    pub is_loading: bool,
    /// User-facing error from the last operation.
    pub error: Option<String>,
}

impl AuthState {
    /// Initial unauthenticated state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state hydrated from a persisted slice.
    #[must_use]
    pub fn from_persisted(slice: PersistedAuth) -> Self {
        Self {
            user: slice.user,
            is_email_verified: slice.is_email_verified,
            ..Self::default()
        }
    }

    /// The slice written to storage.
    #[must_use]
    pub fn persisted(&self) -> PersistedAuth {
        PersistedAuth {
            user: self.user.clone(),
            is_email_verified: self.is_email_verified,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Id of the signed-in user.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    /// Enter an operation: loading on, previous error cleared.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Leave an operation successfully.
    pub fn finish(&mut self) {
        self.is_loading = false;
        self.error = None;
    }

    /// Leave an operation with a user-facing error.
    pub fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }
}

/// Persisted auth slice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    /// Signed-in user.
    pub user: Option<User>,
    /// Verification flag.
    pub is_email_verified: bool,
}
