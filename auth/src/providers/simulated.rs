//! Simulated identity backend.
//!
//! Waits for a fixed latency and returns canned results. Addresses containing
//! `unverified` are treated as registered but not yet verified.

use super::AuthProvider;
use crate::config::AuthLatencies;
use crate::error::{AuthError, Result};
use crate::state::{User, UserId};
use std::sync::Arc;
use std::time::Duration;

/// Marker that makes sign-in report a pending verification.
const UNVERIFIED_MARKER: &str = "unverified";

/// In-process [`AuthProvider`] with canned latencies.
#[derive(Debug, Clone, Default)]
pub struct SimulatedAuthProvider {
    latencies: AuthLatencies,
    failure: Option<Arc<str>>,
}

impl SimulatedAuthProvider {
    /// Create a provider with the given latencies.
    #[must_use]
    pub const fn new(latencies: AuthLatencies) -> Self {
        Self {
            latencies,
            failure: None,
        }
    }

    /// Make every call fail with `AuthError::Provider(message)`.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Arc::from(message.into()));
        self
    }

    /// Configured latencies.
    #[must_use]
    pub const fn latencies(&self) -> &AuthLatencies {
        &self.latencies
    }

    async fn respond(&self, latency: Duration) -> Result<()> {
        tokio::time::sleep(latency).await;
        match &self.failure {
            Some(message) => Err(AuthError::Provider(message.to_string())),
            None => Ok(()),
        }
    }
}

impl AuthProvider for SimulatedAuthProvider {
    async fn sign_in(&self, email: &str, _password: &str) -> Result<User> {
        self.respond(self.latencies.sign_in).await?;

        if email.contains(UNVERIFIED_MARKER) {
            return Err(AuthError::VerificationRequired {
                email: email.to_string(),
            });
        }

        Ok(User::from_email(UserId::for_email(email), email))
    }

    async fn sign_up(&self, email: &str, _password: &str, name: Option<&str>) -> Result<()> {
        self.respond(self.latencies.sign_up).await?;
        tracing::debug!(email, name, "Verification email sent");
        Ok(())
    }

    async fn sign_out(&self) -> Result<()> {
        self.respond(self.latencies.sign_out).await
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        self.respond(self.latencies.reset_password).await?;
        tracing::debug!(email, "Password reset email sent");
        Ok(())
    }

    async fn confirm_email(&self, _token: &str) -> Result<()> {
        self.respond(self.latencies.confirm_email).await
    }

    async fn resend_verification(&self, email: &str) -> Result<()> {
        self.respond(self.latencies.resend_verification).await?;
        tracing::debug!(email, "Verification email resent");
        Ok(())
    }
}
