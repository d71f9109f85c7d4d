//! Authentication providers.
//!
//! The reducer never talks to an identity backend directly. Every
//! provider-backed command becomes an effect that calls an [`AuthProvider`]
//! and maps its result to an event:
//!
//! ```text
//! SignIn ──► provider.sign_in ──┬─ Ok(user)                  ──► SignedIn
//!                               ├─ Err(VerificationRequired) ──► VerificationRequired
//!                               └─ Err(other)                ──► Failed (classified)
//! ```
//!
//! This enables:
//! - **Testing**: [`SimulatedAuthProvider`] with canned latencies and failures
//! - **Production**: a provider backed by a real identity service, whose raw
//!   error text goes through the same classification

use crate::error::Result;
use crate::state::User;
use std::future::Future;

pub mod simulated;

pub use simulated::SimulatedAuthProvider;

/// Identity backend capability.
///
/// Implementations must be cheap to clone; the reducer clones the provider
/// into every effect it starts.
pub trait AuthProvider: Clone + Send + Sync + 'static {
    /// Verify credentials and return the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::VerificationRequired`](crate::AuthError::VerificationRequired)
    /// if the address is not verified yet, or
    /// [`AuthError::Provider`](crate::AuthError::Provider) for any other failure.
    fn sign_in(&self, email: &str, password: &str) -> impl Future<Output = Result<User>> + Send;

    /// Register an account and send a verification email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`](crate::AuthError::Provider) if registration fails.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`](crate::AuthError::Provider) if the backend rejects it.
    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;

    /// Send a password reset email.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`](crate::AuthError::Provider) if the email cannot be sent.
    fn reset_password(&self, email: &str) -> impl Future<Output = Result<()>> + Send;

    /// Confirm an address with a verification token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`](crate::AuthError::Provider) if the token is
    /// expired or invalid.
    fn confirm_email(&self, token: &str) -> impl Future<Output = Result<()>> + Send;

    /// Send the verification email again.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Provider`](crate::AuthError::Provider) if the email cannot be sent.
    fn resend_verification(&self, email: &str) -> impl Future<Output = Result<()>> + Send;
}
