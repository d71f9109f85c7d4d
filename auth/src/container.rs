//! The authentication container.
//!
//! [`AuthContainer`] owns a [`Store`] running [`AuthReducer`] and is the
//! surface the presentation layer talks to: async operations that resolve
//! once the state reflects their outcome, direct setters, and a snapshot
//! subscription for re-rendering.

use crate::actions::AuthAction;
use crate::config::AuthConfig;
use crate::constants::AUTH_STORAGE_KEY;
use crate::environment::AuthEnvironment;
use crate::error::Result;
use crate::providers::AuthProvider;
use crate::reducer::AuthReducer;
use crate::state::{AuthMode, AuthState, PersistedAuth, User};
use crate::validation::{SignInForm, SignUpForm, validate_token};
use std::sync::Arc;
use std::time::Duration;
use todoapp_core::persistence::{PersistenceAdapter, load_slice};
use todoapp_runtime::{OperationGate, Store};
use tokio::sync::watch;

/// Store type behind an [`AuthContainer`].
pub type AuthStore<P> = Store<AuthState, AuthAction, AuthEnvironment<P>, AuthReducer<P>>;

/// Authentication container.
///
/// Provider failures never surface as `Err`: they end up in
/// [`AuthState::error`] as a classified message. Only validation and store
/// shutdown are reported to the caller.
pub struct AuthContainer<P>
where
    P: AuthProvider,
{
    store: AuthStore<P>,
    gate: OperationGate,
}

impl<P> AuthContainer<P>
where
    P: AuthProvider,
{
    /// Create a container with an explicit initial state.
    #[must_use]
    pub fn new(
        initial: AuthState,
        provider: P,
        storage: Arc<dyn PersistenceAdapter>,
        config: &AuthConfig,
    ) -> Self {
        let env = AuthEnvironment::new(provider, storage);
        Self {
            store: Store::new(initial, AuthReducer::new(), env),
            gate: OperationGate::new(config.ordering),
        }
    }

    /// Create a container hydrated from the persisted slice in `storage`.
    ///
    /// A missing slice leaves the initial state. An unreadable slice is
    /// logged and ignored.
    pub async fn hydrate(
        provider: P,
        storage: Arc<dyn PersistenceAdapter>,
        config: &AuthConfig,
    ) -> Self {
        let initial = match load_slice::<PersistedAuth>(storage.as_ref(), AUTH_STORAGE_KEY).await {
            Ok(Some(slice)) => {
                tracing::debug!(signed_in = slice.user.is_some(), "Hydrated auth slice");
                AuthState::from_persisted(slice)
            },
            Ok(None) => AuthState::new(),
            Err(error) => {
                tracing::warn!(%error, key = AUTH_STORAGE_KEY, "Ignoring unreadable auth slice");
                AuthState::new()
            },
        };

        Self::new(initial, provider, storage, config)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Operations
    // ═══════════════════════════════════════════════════════════════════════

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field is empty, or
    /// `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        SignInForm::new(email, password).validate()?;
        self.operation(AuthAction::SignIn {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    /// Register an account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str, name: Option<&str>) -> Result<()> {
        self.operation(AuthAction::SignUp {
            email: email.to_string(),
            password: password.to_string(),
            name: name.map(str::to_string),
        })
        .await
    }

    /// Validate a sign-up form, then register.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the form is rejected, or
    /// `AuthError::Store` if the container is shutting down.
    pub async fn submit_sign_up(&self, form: &SignUpForm) -> Result<()> {
        form.validate()?;
        self.sign_up(&form.email, &form.password, Some(&form.name)).await
    }

    /// Sign out and return to the initial state.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<()> {
        self.operation(AuthAction::SignOut).await
    }

    /// Request a password reset email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn reset_password(&self, email: &str) -> Result<()> {
        self.operation(AuthAction::ResetPassword {
            email: email.to_string(),
        })
        .await
    }

    /// Confirm an address with a verification token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the token is blank, or
    /// `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self, token))]
    pub async fn confirm_email(&self, token: &str) -> Result<()> {
        validate_token(token)?;
        self.operation(AuthAction::ConfirmEmail {
            token: token.to_string(),
        })
        .await
    }

    /// Send the verification email again.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> Result<()> {
        self.operation(AuthAction::ResendVerification {
            email: email.to_string(),
        })
        .await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Direct setters
    // ═══════════════════════════════════════════════════════════════════════

    /// Switch flow step and clear the error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    pub async fn set_mode(&self, mode: AuthMode) -> Result<()> {
        self.set(AuthAction::SetMode { mode }).await
    }

    /// Overwrite the error field.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    pub async fn set_error(&self, error: Option<String>) -> Result<()> {
        self.set(AuthAction::SetError { error }).await
    }

    /// Clear the error field.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.set(AuthAction::ClearError).await
    }

    /// Overwrite the loading flag.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    pub async fn set_loading(&self, loading: bool) -> Result<()> {
        self.set(AuthAction::SetLoading { loading }).await
    }

    /// Overwrite the signed-in user. The slice is persisted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the container is shutting down.
    pub async fn set_user(&self, user: Option<User>) -> Result<()> {
        self.set(AuthAction::SetUser { user }).await
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// Snapshot of the current state.
    pub async fn state(&self) -> AuthState {
        self.store.snapshot().await
    }

    /// The signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.store.state(|s| s.user.clone()).await
    }

    /// Whether a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.store.state(AuthState::is_authenticated).await
    }

    /// Subscribe to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.store.subscribe()
    }

    /// Wait for outstanding persistence writes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if writes are still running after `timeout`.
    pub async fn flush(&self, timeout: Duration) -> Result<()> {
        self.store.wait_idle(timeout).await?;
        Ok(())
    }

    /// Stop accepting operations and wait for in-flight work.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if work is still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    /// Run a provider-backed command to completion.
    async fn operation(&self, action: AuthAction) -> Result<()> {
        let _pass = self.gate.enter().await;
        let mut handle = self.store.send(action).await?;
        handle.wait().await;
        Ok(())
    }

    async fn set(&self, action: AuthAction) -> Result<()> {
        self.store.send(action).await?;
        Ok(())
    }
}

impl<P> Clone for AuthContainer<P>
where
    P: AuthProvider,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gate: self.gate.clone(),
        }
    }
}
