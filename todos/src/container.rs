//! The todo container.

use crate::actions::TodoAction;
use crate::config::TodoConfig;
use crate::constants::TODO_STORAGE_KEY;
use crate::environment::TodoEnvironment;
use crate::error::{Result, validate_title};
use crate::gateway::TodoGateway;
use crate::reducer::TodoReducer;
use crate::state::{NewTodo, PersistedTodos, Priority, TodoId, TodoItem, TodoPatch, TodoState, TodoSummary};
use std::sync::Arc;
use std::time::Duration;
use todoapp_core::environment::Clock;
use todoapp_core::persistence::{PersistenceAdapter, load_slice};
use todoapp_runtime::{OperationGate, Store};
use tokio::sync::watch;

/// Store type behind a [`TodoContainer`].
pub type TodoStore<G> = Store<TodoState, TodoAction, TodoEnvironment<G>, TodoReducer<G>>;

/// Todo container.
///
/// Remote write failures never surface as `Err`; they land in
/// [`TodoState::error`]. Only validation and store shutdown are reported to
/// the caller. Operations on an id that does not exist complete without
/// changing anything.
pub struct TodoContainer<G>
where
    G: TodoGateway,
{
    store: TodoStore<G>,
    gate: OperationGate,
}

impl<G> TodoContainer<G>
where
    G: TodoGateway,
{
    /// Create a container with an explicit initial state.
    #[must_use]
    pub fn new(
        initial: TodoState,
        gateway: G,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn PersistenceAdapter>,
        config: &TodoConfig,
    ) -> Self {
        let env = TodoEnvironment::new(gateway, clock, storage);
        Self {
            store: Store::new(initial, TodoReducer::new(), env),
            gate: OperationGate::new(config.ordering),
        }
    }

    /// Create a container hydrated from the persisted slice in `storage`.
    ///
    /// A missing slice leaves the list empty. An unreadable slice is logged
    /// and ignored.
    pub async fn hydrate(
        gateway: G,
        clock: Arc<dyn Clock>,
        storage: Arc<dyn PersistenceAdapter>,
        config: &TodoConfig,
    ) -> Self {
        let initial = match load_slice::<PersistedTodos>(storage.as_ref(), TODO_STORAGE_KEY).await {
            Ok(Some(slice)) => {
                tracing::debug!(count = slice.todos.len(), "Hydrated todo slice");
                TodoState::from_persisted(slice)
            },
            Ok(None) => TodoState::new(),
            Err(error) => {
                tracing::warn!(%error, key = TODO_STORAGE_KEY, "Ignoring unreadable todo slice");
                TodoState::new()
            },
        };

        Self::new(initial, gateway, clock, storage, config)
    }

    /// Create a todo owned by `user_id` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Validation` if the title is blank, or
    /// `TodoError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self, description))]
    pub async fn add_todo(
        &self,
        title: &str,
        description: Option<&str>,
        priority: Option<Priority>,
        user_id: &str,
    ) -> Result<()> {
        let draft = NewTodo::new(title, user_id)
            .with_description(description.unwrap_or_default())
            .with_priority(priority.unwrap_or_default());
        self.add(draft).await
    }

    /// Create a todo from a draft.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Validation` if the title is blank, or
    /// `TodoError::Store` if the container is shutting down.
    pub async fn add(&self, draft: NewTodo) -> Result<()> {
        validate_title(&draft.title)?;
        self.operation(TodoAction::Add { draft }).await
    }

    /// Merge `patch` into the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Validation` if the patch sets a blank title, or
    /// `TodoError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_todo(&self, id: &TodoId, patch: TodoPatch) -> Result<()> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        self.operation(TodoAction::Update {
            id: id.clone(),
            patch,
        })
        .await
    }

    /// Remove the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo(&self, id: &TodoId) -> Result<()> {
        self.operation(TodoAction::Delete { id: id.clone() }).await
    }

    /// Flip the completion flag of the todo with `id`.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if the container is shutting down.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_todo(&self, id: &TodoId) -> Result<()> {
        self.operation(TodoAction::Toggle { id: id.clone() }).await
    }

    /// Clear the error field.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if the container is shutting down.
    pub async fn clear_error(&self) -> Result<()> {
        self.store.send(TodoAction::ClearError).await?;
        Ok(())
    }

    /// Overwrite the loading flag.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if the container is shutting down.
    pub async fn set_loading(&self, loading: bool) -> Result<()> {
        self.store.send(TodoAction::SetLoading { loading }).await?;
        Ok(())
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> TodoState {
        self.store.snapshot().await
    }

    /// Todos owned by `user_id`, in insertion order.
    pub async fn todos_by_user(&self, user_id: &str) -> Vec<TodoItem> {
        self.store.state(|s| s.todos_by_user(user_id)).await
    }

    /// Header counts for `user_id`.
    pub async fn summary_for(&self, user_id: &str) -> TodoSummary {
        self.store.state(|s| s.summary_for(user_id)).await
    }

    /// Look up a todo by id.
    pub async fn get(&self, id: &TodoId) -> Option<TodoItem> {
        self.store.state(|s| s.get(id).cloned()).await
    }

    /// Subscribe to state snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.store.subscribe()
    }

    /// Wait for outstanding persistence writes.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if writes are still running after `timeout`.
    pub async fn flush(&self, timeout: Duration) -> Result<()> {
        self.store.wait_idle(timeout).await?;
        Ok(())
    }

    /// Stop accepting operations and wait for in-flight work.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::Store` if work is still running after `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    async fn operation(&self, action: TodoAction) -> Result<()> {
        let _pass = self.gate.enter().await;
        let mut handle = self.store.send(action).await?;
        handle.wait().await;
        Ok(())
    }
}

impl<G> Clone for TodoContainer<G>
where
    G: TodoGateway,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            gate: self.gate.clone(),
        }
    }
}
