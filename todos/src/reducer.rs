//! Todo reducer.
//!
//! All four mutating commands share one envelope: enter loading, confirm
//! the write through the gateway, then apply it or record the failure. The
//! list only changes when the confirmation event is reduced, and only a
//! change that actually happened is persisted.

use crate::actions::TodoAction;
use crate::constants::TODO_STORAGE_KEY;
use crate::environment::TodoEnvironment;
use crate::gateway::TodoGateway;
use crate::state::{TodoId, TodoItem, TodoPatch, TodoState};
use todoapp_core::effect::Effect;
use todoapp_core::reducer::Reducer;
use todoapp_core::{SmallVec, smallvec};

/// Reducer for the todo list.
#[derive(Debug, Clone)]
pub struct TodoReducer<G> {
    _phantom: std::marker::PhantomData<G>,
}

impl<G> TodoReducer<G> {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G> Default for TodoReducer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> TodoReducer<G>
where
    G: TodoGateway,
{
    /// Start the confirmed update of `id`.
    fn start_update(
        state: &mut TodoState,
        id: TodoId,
        patch: TodoPatch,
        env: &TodoEnvironment<G>,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        state.begin();
        let gateway = env.gateway.clone();

        smallvec![Effect::future(async move {
            Some(match gateway.update(&id, &patch).await {
                Ok(()) => TodoAction::Updated { id, patch },
                Err(error) => TodoAction::Failed {
                    message: error.to_string(),
                },
            })
        })]
    }

    /// Write the `{todos}` slice. Failures are logged, never surfaced.
    fn persist(state: &TodoState, env: &TodoEnvironment<G>) -> Effect<TodoAction> {
        let write = env.slices.stage(&state.persisted());

        Effect::future(async move {
            if let Err(error) = write.commit().await {
                tracing::warn!(%error, key = TODO_STORAGE_KEY, "Failed to persist todo slice");
            }
            None
        })
    }
}

impl<G> Reducer for TodoReducer<G>
where
    G: TodoGateway,
{
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment<G>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TodoAction::Add { draft } => {
                state.begin();
                let gateway = env.gateway.clone();

                smallvec![Effect::future(async move {
                    Some(match gateway.add(&draft).await {
                        Ok(()) => TodoAction::Added { draft },
                        Err(error) => TodoAction::Failed {
                            message: error.to_string(),
                        },
                    })
                })]
            },

            TodoAction::Update { id, patch } => Self::start_update(state, id, patch, env),

            TodoAction::Toggle { id } => {
                let Some(completed) = state.get(&id).map(|todo| todo.completed) else {
                    tracing::debug!(%id, "Toggle ignored: no such todo");
                    return smallvec![Effect::None];
                };
                Self::start_update(state, id, TodoPatch::new().completed(!completed), env)
            },

            TodoAction::Delete { id } => {
                state.begin();
                let gateway = env.gateway.clone();

                smallvec![Effect::future(async move {
                    Some(match gateway.delete(&id).await {
                        Ok(()) => TodoAction::Deleted { id },
                        Err(error) => TodoAction::Failed {
                            message: error.to_string(),
                        },
                    })
                })]
            },

            TodoAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            TodoAction::SetLoading { loading } => {
                state.is_loading = loading;
                smallvec![Effect::None]
            },

            TodoAction::Added { draft } => {
                let now = env.clock.now();
                let id = state.issue_id(now);
                tracing::info!(%id, user_id = %draft.user_id, "Todo added");

                state.todos.push(TodoItem::from_draft(id, draft, now));
                state.finish();
                smallvec![Self::persist(state, env)]
            },

            TodoAction::Updated { id, patch } => {
                let now = env.clock.now();
                state.finish();

                match state.get_mut(&id) {
                    Some(todo) => {
                        todo.apply(patch, now);
                        tracing::debug!(%id, "Todo updated");
                        smallvec![Self::persist(state, env)]
                    },
                    None => {
                        tracing::debug!(%id, "Update ignored: no such todo");
                        smallvec![Effect::None]
                    },
                }
            },

            TodoAction::Deleted { id } => {
                state.finish();
                let before = state.todos.len();
                state.todos.retain(|todo| todo.id != id);

                if state.todos.len() == before {
                    tracing::debug!(%id, "Delete ignored: no such todo");
                    smallvec![Effect::None]
                } else {
                    tracing::debug!(%id, "Todo deleted");
                    smallvec![Self::persist(state, env)]
                }
            },

            TodoAction::Failed { message } => {
                tracing::warn!(%message, "Todo write failed");
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
    use crate::config::TodoLatencies;
    use crate::gateway::SimulatedTodoGateway;
    use crate::state::{NewTodo, PersistedTodos, Priority};
    use std::sync::Arc;
    use std::time::Duration;
    use todoapp_core::environment::Clock;
    use todoapp_testing::{InMemoryStorage, ReducerTest, assertions, test_clock};

    type TestReducer = TodoReducer<SimulatedTodoGateway>;

    fn env() -> TodoEnvironment<SimulatedTodoGateway> {
        env_with(&InMemoryStorage::new())
    }

    fn env_with(storage: &InMemoryStorage) -> TodoEnvironment<SimulatedTodoGateway> {
        TodoEnvironment::new(
            SimulatedTodoGateway::new(TodoLatencies::uniform(Duration::ZERO)),
            Arc::new(test_clock()),
            Arc::new(storage.clone()),
        )
    }

    fn existing() -> TodoState {
        let now = test_clock().now();
        TodoState {
            todos: vec![TodoItem::from_draft(
                TodoId::new("1"),
                NewTodo::new("Existing", "user-1"),
                now,
            )],
            ..TodoState::default()
        }
    }

    #[test]
    fn test_add_enters_loading() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState {
                error: Some("old".to_string()),
                ..TodoState::default()
            })
            .when_action(TodoAction::Add {
                draft: NewTodo::new("Buy milk", "user-1"),
            })
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(state.error.is_none());
                assert!(state.todos.is_empty());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_added_appends_item() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(existing())
            .when_action(TodoAction::Added {
                draft: NewTodo::new("Buy milk", "user-1")
                    .with_description("2 litres")
                    .with_priority(Priority::High),
            })
            .then_state(|state| {
                assert_eq!(state.todos.len(), 2);
                let added = &state.todos[1];
                assert_eq!(added.title, "Buy milk");
                assert_eq!(added.description, "2 litres");
                assert_eq!(added.priority, Priority::High);
                assert!(!added.completed);
                assert_eq!(added.created_at, added.updated_at);
                assert_eq!(added.user_id, "user-1");
                assert_eq!(
                    added.id.as_str(),
                    test_clock().now().timestamp_millis().to_string()
                );
                assert!(!state.is_loading);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn test_add_feeds_back_confirmation() {
        let draft = NewTodo::new("Buy milk", "user-1");

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState::default())
            .when_action(TodoAction::Add {
                draft: draft.clone(),
            })
            .then_feedback(move |actions| assert_eq!(actions, &[TodoAction::Added { draft }]))
            .run();
    }

    #[test]
    fn test_added_persists_whole_list() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env_with(&storage))
            .given_state(existing())
            .when_action(TodoAction::Added {
                draft: NewTodo::new("Buy milk", "user-1"),
            })
            .then_feedback(|actions| assert!(actions.is_empty()))
            .then_persisted(&storage, TODO_STORAGE_KEY, |slice: Option<PersistedTodos>| {
                let titles: Vec<_> = slice.unwrap().todos.into_iter().map(|t| t.title).collect();
                assert_eq!(titles, vec!["Existing", "Buy milk"]);
            })
            .run();
    }

    #[test]
    fn test_added_after_delete_gets_fresh_id() {
        let mut state = existing();
        let env = env();
        let reducer = TestReducer::new();

        let added = |title: &str| TodoAction::Added {
            draft: NewTodo::new(title, "user-1"),
        };

        let _ = reducer.reduce(&mut state, added("A"), &env);
        let deleted = state.todos[1].id.clone();
        let _ = reducer.reduce(&mut state, TodoAction::Deleted { id: deleted.clone() }, &env);
        let _ = reducer.reduce(&mut state, added("B"), &env);

        let millis = |id: &TodoId| id.as_str().parse::<i64>().unwrap();
        assert_eq!(state.todos.len(), 2);
        assert_ne!(state.todos[1].id, deleted);
        assert!(millis(&state.todos[1].id) > millis(&deleted));
    }

    #[test]
    fn test_toggle_missing_id_is_noop() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(existing())
            .when_action(TodoAction::Toggle {
                id: TodoId::new("404"),
            })
            .then_state(|state| {
                assert_eq!(*state, existing());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_toggle_existing_starts_update() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(existing())
            .when_action(TodoAction::Toggle { id: TodoId::new("1") })
            .then_state(|state| {
                assert!(state.is_loading);
                assert!(!state.todos[0].completed);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_updated_merges_and_bumps_timestamp() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(existing())
            .when_action(TodoAction::Updated {
                id: TodoId::new("1"),
                patch: TodoPatch::new().completed(true),
            })
            .then_state(|state| {
                let todo = &state.todos[0];
                assert!(todo.completed);
                assert_eq!(todo.title, "Existing");
                assert!(todo.updated_at > todo.created_at);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn test_updated_missing_id_leaves_list() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState {
                is_loading: true,
                ..existing()
            })
            .when_action(TodoAction::Updated {
                id: TodoId::new("404"),
                patch: TodoPatch::new().title("x"),
            })
            .then_state(|state| {
                assert_eq!(state.todos, existing().todos);
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_deleted_removes_one() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(existing())
            .when_action(TodoAction::Deleted { id: TodoId::new("1") })
            .then_state(|state| assert!(state.todos.is_empty()))
            .then_effects(assertions::assert_has_future_effect)
            .run();

        let storage = InMemoryStorage::new();
        ReducerTest::new(TestReducer::new())
            .with_env(env_with(&storage))
            .given_state(existing())
            .when_action(TodoAction::Deleted { id: TodoId::new("1") })
            .then_persisted(&storage, TODO_STORAGE_KEY, |slice: Option<PersistedTodos>| {
                assert_eq!(slice, Some(PersistedTodos::default()));
            })
            .run();
    }

    #[test]
    fn test_deleted_missing_id_is_not_persisted() {
        let storage = InMemoryStorage::new();

        ReducerTest::new(TestReducer::new())
            .with_env(env_with(&storage))
            .given_state(existing())
            .when_action(TodoAction::Deleted {
                id: TodoId::new("404"),
            })
            .then_state(|state| assert_eq!(state.todos, existing().todos))
            .then_effects(assertions::assert_no_effects)
            .then_persisted(&storage, TODO_STORAGE_KEY, |slice: Option<PersistedTodos>| {
                assert!(slice.is_none());
            })
            .run();
    }

    #[test]
    fn test_failed_keeps_list() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState {
                is_loading: true,
                ..existing()
            })
            .when_action(TodoAction::Failed {
                message: "Failed to add todo".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.todos, existing().todos);
                assert_eq!(state.error.as_deref(), Some("Failed to add todo"));
                assert!(!state.is_loading);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_setters() {
        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState {
                error: Some("x".to_string()),
                ..TodoState::default()
            })
            .when_action(TodoAction::ClearError)
            .then_state(|state| assert!(state.error.is_none()))
            .run();

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(TodoState::default())
            .when_action(TodoAction::SetLoading { loading: true })
            .then_state(|state| assert!(state.is_loading))
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
