//! The composed application.
//!
//! [`App`] owns one auth container and one todo container sharing a single
//! storage backend. Todo writes are attributed to whoever is signed in, and
//! the `my_*` queries are scoped to that user.

use crate::config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use todoapp_auth::{AuthContainer, AuthError, AuthProvider, SimulatedAuthProvider, User};
use todoapp_core::environment::SystemClock;
use todoapp_core::persistence::PersistenceAdapter;
use todoapp_todos::{
    Priority, SimulatedTodoGateway, TodoContainer, TodoError, TodoGateway, TodoItem, TodoSummary,
};

/// Errors from whole-application operations.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The auth container failed.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    /// The todo container failed.
    #[error("todos: {0}")]
    Todo(#[from] TodoError),
}

/// Auth and todo containers wired together.
pub struct App<P = SimulatedAuthProvider, G = SimulatedTodoGateway>
where
    P: AuthProvider,
    G: TodoGateway,
{
    auth: AuthContainer<P>,
    todos: TodoContainer<G>,
}

impl App {
    /// Hydrate both containers from `storage` with the simulated backends.
    pub async fn bootstrap(config: &AppConfig, storage: Arc<dyn PersistenceAdapter>) -> Self {
        let auth_config = config.auth_config();
        let todo_config = config.todo_config();

        let auth = AuthContainer::hydrate(
            SimulatedAuthProvider::new(auth_config.latencies),
            Arc::clone(&storage),
            &auth_config,
        )
        .await;
        let todos = TodoContainer::hydrate(
            SimulatedTodoGateway::new(todo_config.latencies),
            Arc::new(SystemClock),
            storage,
            &todo_config,
        )
        .await;

        let signed_in = auth.is_authenticated().await;
        let count = todos.state().await.count();
        tracing::info!(signed_in, todos = count, "App ready");
        Self::from_parts(auth, todos)
    }
}

impl<P, G> App<P, G>
where
    P: AuthProvider,
    G: TodoGateway,
{
    /// Compose already constructed containers.
    #[must_use]
    pub const fn from_parts(auth: AuthContainer<P>, todos: TodoContainer<G>) -> Self {
        Self { auth, todos }
    }

    /// The auth container.
    #[must_use]
    pub const fn auth(&self) -> &AuthContainer<P> {
        &self.auth
    }

    /// The todo container.
    #[must_use]
    pub const fn todos(&self) -> &TodoContainer<G> {
        &self.todos
    }

    /// Create a todo owned by the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotSignedIn`] if nobody is signed in, otherwise
    /// whatever [`TodoContainer::add_todo`] returns.
    pub async fn add_todo(
        &self,
        title: &str,
        description: Option<&str>,
        priority: Option<Priority>,
    ) -> Result<(), TodoError> {
        let user = self.require_user().await?;
        self.todos
            .add_todo(title, description, priority, user.id.as_str())
            .await
    }

    /// The signed-in user's todos in insertion order. Empty when signed out.
    pub async fn my_todos(&self) -> Vec<TodoItem> {
        match self.auth.current_user().await {
            Some(user) => self.todos.todos_by_user(user.id.as_str()).await,
            None => Vec::new(),
        }
    }

    /// Header counts for the signed-in user. Zero when signed out.
    pub async fn my_summary(&self) -> TodoSummary {
        match self.auth.current_user().await {
            Some(user) => self.todos.summary_for(user.id.as_str()).await,
            None => TodoSummary::default(),
        }
    }

    /// Wait for both containers' outstanding persistence writes.
    ///
    /// # Errors
    ///
    /// Returns an error if either container is still writing after `timeout`.
    pub async fn flush(&self, timeout: Duration) -> Result<(), AppError> {
        let (auth, todos) = tokio::join!(self.auth.flush(timeout), self.todos.flush(timeout));
        auth?;
        todos?;
        Ok(())
    }

    /// Shut both containers down.
    ///
    /// # Errors
    ///
    /// Returns an error if either container still has work after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), AppError> {
        let (auth, todos) = tokio::join!(self.auth.shutdown(timeout), self.todos.shutdown(timeout));
        auth?;
        todos?;
        tracing::info!("App shut down");
        Ok(())
    }

    async fn require_user(&self) -> Result<User, TodoError> {
        self.auth.current_user().await.ok_or(TodoError::NotSignedIn)
    }
}

impl<P, G> Clone for App<P, G>
where
    P: AuthProvider,
    G: TodoGateway,
{
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            todos: self.todos.clone(),
        }
    }
}
