//! Authentication reducer.
//!
//! Implements the flow state machine over [`AuthMode`]:
//!
//! ```text
//!  signin ──SignUp──► verify-email ──ConfirmEmail──► signin
//!    │                    ▲
//!    └──SignIn (unverified)┘
//! ```
//!
//! Every provider-backed command enters loading and clears the previous
//! error, then returns one effect that calls the provider. The event the
//! effect feeds back finishes the operation. Events that change `user` or
//! `isEmailVerified` also return a persistence effect that writes the
//! `{user, isEmailVerified}` slice.

use crate::actions::AuthAction;
use crate::constants::AUTH_STORAGE_KEY;
use crate::environment::AuthEnvironment;
use crate::error::AuthError;
use crate::providers::AuthProvider;
use crate::state::{AuthMode, AuthState};
use todoapp_core::effect::Effect;
use todoapp_core::reducer::Reducer;
use todoapp_core::{SmallVec, smallvec};

/// Authentication reducer.
#[derive(Debug, Clone)]
pub struct AuthReducer<P> {
    _phantom: std::marker::PhantomData<P>,
}

impl<P> AuthReducer<P> {
    /// Create a new auth reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<P> Default for AuthReducer<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Event reported for a provider call that returns no data.
fn completion(result: crate::error::Result<()>, on_success: AuthAction) -> AuthAction {
    match result {
        Ok(()) => on_success,
        Err(error) => failure(&error),
    }
}

/// Event reported for a failed provider call.
fn failure(error: &AuthError) -> AuthAction {
    tracing::debug!(%error, "Auth provider call failed");
    AuthAction::Failed {
        message: error.user_message(),
    }
}

/// Write the persisted slice. Failures are logged, never surfaced.
///
/// The write is staged here so it cannot be overtaken by an older one.
fn persist<P: AuthProvider>(state: &AuthState, env: &AuthEnvironment<P>) -> Effect<AuthAction> {
    let write = env.slices.stage(&state.persisted());

    Effect::future(async move {
        if let Err(error) = write.commit().await {
            tracing::warn!(%error, key = AUTH_STORAGE_KEY, "Failed to persist auth slice");
        }
        None
    })
}

impl<P> Reducer for AuthReducer<P>
where
    P: AuthProvider,
{
    type State = AuthState;
    type Action = AuthAction;
    type Environment = AuthEnvironment<P>;

    #[allow(clippy::too_many_lines)] // One arm per action keeps the state machine readable
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Provider-backed commands
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SignIn { email, password } => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    let event = match provider.sign_in(&email, &password).await {
                        Ok(user) => AuthAction::SignedIn { user },
                        Err(error @ AuthError::VerificationRequired { .. }) => {
                            AuthAction::VerificationRequired {
                                message: error.user_message(),
                                email,
                            }
                        },
                        Err(error) => failure(&error),
                    };
                    Some(event)
                })]
            },

            AuthAction::SignUp {
                email,
                password,
                name,
            } => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    let result = provider.sign_up(&email, &password, name.as_deref()).await;
                    Some(completion(result, AuthAction::SignedUp { email }))
                })]
            },

            AuthAction::SignOut => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    Some(completion(provider.sign_out().await, AuthAction::SignedOut))
                })]
            },

            AuthAction::ResetPassword { email } => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    let result = provider.reset_password(&email).await;
                    Some(completion(result, AuthAction::PasswordResetSent { email }))
                })]
            },

            AuthAction::ConfirmEmail { token } => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    let result = provider.confirm_email(&token).await;
                    Some(completion(result, AuthAction::EmailConfirmed))
                })]
            },

            AuthAction::ResendVerification { email } => {
                state.begin();
                let provider = env.provider.clone();

                smallvec![Effect::future(async move {
                    let result = provider.resend_verification(&email).await;
                    Some(completion(result, AuthAction::VerificationResent))
                })]
            },

            // ═══════════════════════════════════════════════════════════════
            // Direct setters
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SetMode { mode } => {
                state.mode = mode;
                state.error = None;
                smallvec![Effect::None]
            },

            AuthAction::SetError { error } => {
                state.error = error;
                smallvec![Effect::None]
            },

            AuthAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            AuthAction::SetLoading { loading } => {
                state.is_loading = loading;
                smallvec![Effect::None]
            },

            AuthAction::SetUser { user } => {
                state.user = user;
                smallvec![persist(state, env)]
            },

            // ═══════════════════════════════════════════════════════════════
            // Events
            // ═══════════════════════════════════════════════════════════════
            AuthAction::SignedIn { user } => {
                tracing::info!(user_id = %user.id, "Signed in");
                state.user = Some(user);
                state.is_email_verified = true;
                state.finish();
                smallvec![persist(state, env)]
            },

            AuthAction::VerificationRequired { email, message } => {
                tracing::info!(%email, "Sign-in requires email verification");
                state.fail(message);
                state.email_pending_verification = Some(email);
                state.mode = AuthMode::VerifyEmail;
                smallvec![Effect::None]
            },

            AuthAction::SignedUp { email } => {
                state.finish();
                state.email_pending_verification = Some(email);
                state.mode = AuthMode::VerifyEmail;
                smallvec![Effect::None]
            },

            AuthAction::SignedOut => {
                tracing::info!("Signed out");
                *state = AuthState::default();
                smallvec![persist(state, env)]
            },

            AuthAction::PasswordResetSent { email } => {
                state.finish();
                state.email_pending_verification = Some(email);
                smallvec![Effect::None]
            },

            AuthAction::EmailConfirmed => {
                state.finish();
                state.is_email_verified = true;
                state.mode = AuthMode::Signin;
                smallvec![persist(state, env)]
            },

            AuthAction::VerificationResent => {
                state.finish();
                smallvec![Effect::None]
            },

            AuthAction::Failed { message } => {
                state.fail(message);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::AuthLatencies;
    use crate::constants::messages;
    use crate::providers::SimulatedAuthProvider;
    use crate::state::{PersistedAuth, User, UserId};
    use std::sync::Arc;
    use std::time::Duration;
    use todoapp_testing::{InMemoryStorage, ReducerTest, assertions};

    type TestReducer = AuthReducer<SimulatedAuthProvider>;

    fn env() -> AuthEnvironment<SimulatedAuthProvider> {
        env_with(&InMemoryStorage::new())
    }

    fn env_with(storage: &InMemoryStorage) -> AuthEnvironment<SimulatedAuthProvider> {
        AuthEnvironment::new(
            SimulatedAuthProvider::new(AuthLatencies::uniform(Duration::ZERO)),
            Arc::new(storage.clone()),
        )
    }

    fn user() -> User {
        User::from_email(UserId::for_email("test@x.com"), "test@x.com")
    }

    fn signed_in() -> AuthState {
        AuthState {
            user: Some(user()),
            is_email_verified: true,
            ..AuthState::default()
        }
    }

    #[test]
    fn test_sign_in_enters_loading() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                error: Some("stale".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::SignIn {
                email: "test@x.com".to_string(),
                password: "pw".to_string(),
            })
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(state.error.is_none());
                assert!(state.user.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .then_feedback(|actions| assert_eq!(actions, &[AuthAction::SignedIn { user: user() }]))
            .run();
    }

    #[test]
    fn test_signed_in_sets_user_and_persists() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env_with(&storage))
            .given_state(AuthState {
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::SignedIn { user: user() })
            .then_state(|state| {
                assert_eq!(state.user, Some(user()));
                assert!(state.is_email_verified);
                assert!(!state.is_loading);
                assert!(state.error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .then_persisted(&storage, AUTH_STORAGE_KEY, |slice: Option<PersistedAuth>| {
                assert_eq!(
                    slice,
                    Some(PersistedAuth {
                        user: Some(user()),
                        is_email_verified: true,
                    })
                );
            })
            .run();
    }

    #[test]
    fn test_verification_required_switches_mode() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::VerificationRequired {
                email: "unverified@x.com".to_string(),
                message: messages::VERIFY_EMAIL.to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.mode, AuthMode::VerifyEmail);
                assert_eq!(state.error.as_deref(), Some(messages::VERIFY_EMAIL));
                assert_eq!(
                    state.email_pending_verification.as_deref(),
                    Some("unverified@x.com")
                );
                assert!(state.user.is_none());
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_signed_up_waits_for_verification() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                mode: AuthMode::Signup,
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::SignedUp {
                email: "a@b.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.mode, AuthMode::VerifyEmail);
                assert_eq!(state.email_pending_verification.as_deref(), Some("a@b.com"));
                assert!(state.user.is_none());
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_signed_out_resets_everything() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                mode: AuthMode::Reset,
                email_pending_verification: Some("a@b.com".to_string()),
                is_loading: true,
                ..signed_in()
            })
            .when_action(AuthAction::SignedOut)
            .then_state(|state| assert_eq!(*state, AuthState::default()))
            .then_effects(assertions::assert_has_future_effect)
            .run();

        let storage = InMemoryStorage::new();
        ReducerTest::new(TestReducer::new())
            .with_env(env_with(&storage))
            .given_state(signed_in())
            .when_action(AuthAction::SignedOut)
            .then_feedback(|actions| assert!(actions.is_empty()))
            .then_persisted(&storage, AUTH_STORAGE_KEY, |slice: Option<PersistedAuth>| {
                assert_eq!(slice, Some(PersistedAuth::default()));
            })
            .run();
    }

    #[test]
    fn test_password_reset_keeps_mode() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                mode: AuthMode::Reset,
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::PasswordResetSent {
                email: "a@b.com".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.mode, AuthMode::Reset);
                assert_eq!(state.email_pending_verification.as_deref(), Some("a@b.com"));
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_email_confirmed_returns_to_sign_in() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                mode: AuthMode::ConfirmEmail,
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::EmailConfirmed)
            .then_state(|state| {
                assert!(state.is_email_verified);
                assert_eq!(state.mode, AuthMode::Signin);
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_failed_records_message() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                is_loading: true,
                ..AuthState::default()
            })
            .when_action(AuthAction::Failed {
                message: messages::NETWORK.to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.error.as_deref(), Some(messages::NETWORK));
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_set_mode_clears_error() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState {
                error: Some("boom".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::SetMode {
                mode: AuthMode::Signup,
            })
            .then_state(|state| {
                assert_eq!(state.mode, AuthMode::Signup);
                assert!(state.error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_setters_write_single_field() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::SetError {
                error: Some("custom".to_string()),
            })
            .then_state(|state| {
                assert_eq!(state.error.as_deref(), Some("custom"));
                assert!(!state.is_loading);
            })
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::SetLoading { loading: true })
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(state.error.is_none());
            })
            .run();
    }

    #[test]
    fn test_set_user_persists() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(AuthState::default())
            .when_action(AuthAction::SetUser { user: Some(user()) })
            .then_state(|state| {
                assert_eq!(state.user, Some(user()));
                assert!(!state.is_email_verified);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_every_operation_starts_an_effect() {
        let operations = [
            AuthAction::SignUp {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
                name: Some("A".to_string()),
            },
            AuthAction::SignOut,
            AuthAction::ResetPassword {
                email: "a@b.com".to_string(),
            },
            AuthAction::ConfirmEmail {
                token: "t".to_string(),
            },
            AuthAction::ResendVerification {
                email: "a@b.com".to_string(),
            },
        ];

        for action in operations {
            assert!(action.is_operation());
            ReducerTest::new(TestReducer::new())
                .with_env(env())
                .given_state(AuthState::default())
                .when_action(action)
                .then_state(|state| assert!(state.is_loading))
                .then_effects(assertions::assert_has_future_effect)
                .run();
        }
    }
}
