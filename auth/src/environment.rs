//! Authentication environment.
//!
//! Dependencies injected into [`AuthReducer`](crate::AuthReducer).

use crate::constants::AUTH_STORAGE_KEY;
use crate::providers::AuthProvider;
use std::sync::Arc;
use todoapp_core::persistence::PersistenceAdapter;
use todoapp_runtime::SliceWriter;

/// Authentication environment.
///
/// # Type Parameters
///
/// - `P`: Identity backend
#[derive(Clone)]
pub struct AuthEnvironment<P>
where
    P: AuthProvider,
{
    /// Identity backend.
    pub provider: P,

    /// Ordered writer for the `{user, isEmailVerified}` slice.
    pub slices: SliceWriter,
}

impl<P> AuthEnvironment<P>
where
    P: AuthProvider,
{
    /// Create a new environment.
    #[must_use]
    pub fn new(provider: P, storage: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            provider,
            slices: SliceWriter::new(storage, AUTH_STORAGE_KEY),
        }
    }
}

impl<P> std::fmt::Debug for AuthEnvironment<P>
where
    P: AuthProvider + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEnvironment")
            .field("provider", &self.provider)
            .field("slices", &self.slices)
            .finish()
    }
}
