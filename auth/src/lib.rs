//! # TodoApp Authentication
//!
//! The authentication container: who is signed in and which step of the
//! sign-in flow is active.
//!
//! ## Architecture
//!
//! Authentication is implemented as a reducer and effects:
//!
//! ```text
//! Command → Reducer → (State, Effects) → AuthProvider → Event → Reducer → Persist
//! ```
//!
//! - [`AuthReducer`] holds every state transition
//! - [`AuthProvider`] is the identity backend; [`SimulatedAuthProvider`]
//!   answers with canned results after a fixed delay
//! - [`AuthContainer`] wraps the store, validates input, and resolves each
//!   operation once its outcome is in the state
//!
//! ## Example
//!
//! ```rust,ignore
//! use todoapp_auth::*;
//!
//! let auth = AuthContainer::hydrate(
//!     SimulatedAuthProvider::default(),
//!     storage,
//!     &AuthConfig::default(),
//! )
//! .await;
//!
//! auth.sign_in("test@x.com", "pw").await?;
//! assert_eq!(auth.current_user().await.map(|u| u.name), Some("test".to_string()));
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod constants;
pub mod container;
pub mod environment;
pub mod error;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod validation;

// Re-export main types for convenience
pub use actions::AuthAction;
pub use config::{AuthConfig, AuthLatencies};
pub use constants::AUTH_STORAGE_KEY;
pub use container::{AuthContainer, AuthStore};
pub use environment::AuthEnvironment;
pub use error::{AuthError, Result, classify_auth_error};
pub use providers::{AuthProvider, SimulatedAuthProvider};
pub use reducer::AuthReducer;
pub use state::{AuthMode, AuthState, PersistedAuth, User, UserId};
pub use validation::{SignInForm, SignUpForm};
