//! Domain types for the todo container.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a todo item.
///
/// Generated ids are the creation time in epoch milliseconds. Ids loaded
/// from storage are kept verbatim, numeric or not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Pick an id for a todo created at `now` that differs from every id in
    /// `existing`.
    ///
    /// The id is `now` in epoch milliseconds, or one past the largest
    /// numeric id already present if that is not greater.
    #[must_use]
    pub fn generate<'a>(now: DateTime<Utc>, existing: impl IntoIterator<Item = &'a TodoId>) -> Self {
        let candidate = now.timestamp_millis();
        let largest = existing.into_iter().filter_map(TodoId::as_millis).max();

        let id = match largest {
            Some(largest) if largest >= candidate => largest.saturating_add(1),
            _ => candidate,
        };
        Self(id.to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Todo priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// A single todo item.
///
/// `updated_at >= created_at` always holds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title, never blank
    pub title: String,
    /// Free-form notes, possibly empty
    #[serde(default)]
    pub description: String,
    /// Whether the todo is done
    pub completed: bool,
    /// Priority
    #[serde(default)]
    pub priority: Priority,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
    /// When the todo was last changed
    pub updated_at: DateTime<Utc>,
    /// Owning user
    pub user_id: String,
}

impl TodoItem {
    /// Build a fresh, incomplete todo from a draft.
    #[must_use]
    pub fn from_draft(id: TodoId, draft: NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: false,
            priority: draft.priority,
            created_at: now,
            updated_at: now,
            user_id: draft.user_id,
        }
    }

    /// Merge `patch` into this todo and advance `updated_at`.
    ///
    /// `updated_at` becomes `now`, or one millisecond past its previous value
    /// if the clock has not moved forward.
    pub fn apply(&mut self, patch: TodoPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::milliseconds(1)
        };
    }
}

/// Input for a new todo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    /// Title
    pub title: String,
    /// Notes
    pub description: String,
    /// Priority
    pub priority: Priority,
    /// Owning user
    pub user_id: String,
}

impl NewTodo {
    /// A medium-priority draft with no description.
    #[must_use]
    pub fn new(title: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            user_id: user_id.into(),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Partial update. `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
    /// New priority
    pub priority: Option<Priority>,
}

impl TodoPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the completion flag.
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// List header counts for one user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoSummary {
    /// Todos owned by the user.
    pub total: usize,
    /// Of those, how many are done.
    pub completed: usize,
}

impl fmt::Display for TodoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tasks • {} completed", self.total, self.completed)
    }
}

/// Todo container state.
///
/// Only `todos` survives a restart (see [`PersistedTodos`]).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    /// All todos, in insertion order.
    pub todos: Vec<TodoItem>,
    /// An operation is in flight.
    pub is_loading: bool,
    /// User-facing error from the last operation.
    pub error: Option<String>,
    /// Most recent id handed out by [`issue_id`](Self::issue_id).
    pub last_issued_id: Option<TodoId>,
}

impl TodoState {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state hydrated from a persisted slice.
    #[must_use]
    pub fn from_persisted(slice: PersistedTodos) -> Self {
        Self {
            todos: slice.todos,
            ..Self::default()
        }
    }

    /// The slice written to storage.
    #[must_use]
    pub fn persisted(&self) -> PersistedTodos {
        PersistedTodos {
            todos: self.todos.clone(),
        }
    }

    /// Pick the id for a todo created at `now`.
    ///
    /// Ids only grow: a new id is greater than every numeric id in the list
    /// and every id issued before, so a deleted todo's id is never reused
    /// while the clock stands still.
    pub fn issue_id(&mut self, now: DateTime<Utc>) -> TodoId {
        let id = TodoId::generate(
            now,
            self.todos.iter().map(|todo| &todo.id).chain(self.last_issued_id.as_ref()),
        );
        self.last_issued_id = Some(id.clone());
        id
    }

    /// Look up a todo by id.
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &TodoId) -> Option<&mut TodoItem> {
        self.todos.iter_mut().find(|todo| &todo.id == id)
    }

    /// Number of todos across all users.
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Todos owned by `user_id`, in insertion order.
    #[must_use]
    pub fn todos_by_user(&self, user_id: &str) -> Vec<TodoItem> {
        self.todos
            .iter()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Header counts for `user_id`.
    #[must_use]
    pub fn summary_for(&self, user_id: &str) -> TodoSummary {
        self.todos
            .iter()
            .filter(|todo| todo.user_id == user_id)
            .fold(TodoSummary::default(), |mut summary, todo| {
                summary.total += 1;
                summary.completed += usize::from(todo.completed);
                summary
            })
    }

    /// Enter an operation: loading on, previous error cleared.
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Leave an operation successfully.
    pub fn finish(&mut self) {
        self.is_loading = false;
    }

    /// Leave an operation with a user-facing error.
    pub fn fail(&mut self, message: String) {
        self.is_loading = false;
        self.error = Some(message);
    }
}

/// Persisted todo slice.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTodos {
    /// Every todo, in insertion order.
    pub todos: Vec<TodoItem>,
}
