//! Authentication actions.
//!
//! Actions follow the command/event split used throughout the workspace:
//! - **Commands**: what the caller asked for (`SignIn`, `SetMode`, ...)
//! - **Events**: what the provider reported back (`SignedIn`, `Failed`, ...)
//!
//! Commands that talk to the provider set `is_loading` and return an effect;
//! the effect feeds exactly one event back into the reducer.

use crate::state::{AuthMode, User};

/// Authentication action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Commands (provider-backed)
    // ═══════════════════════════════════════════════════════════════════════
    /// Sign in with email and password.
    SignIn {
        /// Email address.
        email: String,
        /// Password.
        password: String,
    },

    /// Register a new account.
    SignUp {
        /// Email address.
        email: String,
        /// Password.
        password: String,
        /// Optional display name.
        name: Option<String>,
    },

    /// End the current session.
    SignOut,

    /// Request a password reset email.
    ResetPassword {
        /// Address to send the reset link to.
        email: String,
    },

    /// Confirm an email address with the token from the verification link.
    ConfirmEmail {
        /// Verification token.
        token: String,
    },

    /// Send the verification email again.
    ResendVerification {
        /// Address awaiting verification.
        email: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Commands (direct setters)
    // ═══════════════════════════════════════════════════════════════════════
    /// Switch flow step. Clears any error.
    SetMode {
        /// New mode.
        mode: AuthMode,
    },

    /// Overwrite the error field.
    SetError {
        /// New error, or `None` to clear.
        error: Option<String>,
    },

    /// Clear the error field.
    ClearError,

    /// Overwrite the loading flag.
    SetLoading {
        /// New value.
        loading: bool,
    },

    /// Overwrite the signed-in user.
    SetUser {
        /// New user, or `None` to sign out locally.
        user: Option<User>,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Provider accepted the credentials.
    SignedIn {
        /// The authenticated user.
        user: User,
    },

    /// Sign-in hit an address that still needs verification.
    VerificationRequired {
        /// Address awaiting verification.
        email: String,
        /// User-facing prompt.
        message: String,
    },

    /// Account created; verification email sent.
    SignedUp {
        /// Address awaiting verification.
        email: String,
    },

    /// Session ended.
    SignedOut,

    /// Reset email sent.
    PasswordResetSent {
        /// Address the link was sent to.
        email: String,
    },

    /// Address verified.
    EmailConfirmed,

    /// Verification email sent again.
    VerificationResent,

    /// Any provider-backed command failed.
    Failed {
        /// Classified user-facing message.
        message: String,
    },
}

impl AuthAction {
    /// Whether this action is a provider-backed command.
    #[must_use]
    pub const fn is_operation(&self) -> bool {
        matches!(
            self,
            Self::SignIn { .. }
                | Self::SignUp { .. }
                | Self::SignOut
                | Self::ResetPassword { .. }
                | Self::ConfirmEmail { .. }
                | Self::ResendVerification { .. }
        )
    }
}
