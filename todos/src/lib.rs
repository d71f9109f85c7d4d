//! # TodoApp Todos
//!
//! The todo list container: every todo item of every user, in insertion
//! order, plus the loading and error flags of the last operation.
//!
//! Mutations are confirmed by a [`TodoGateway`] before they touch the list;
//! after each confirmed change the whole list is written to storage under
//! [`TODO_STORAGE_KEY`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use todoapp_todos::*;
//!
//! let todos = TodoContainer::hydrate(
//!     SimulatedTodoGateway::default(),
//!     Arc::new(SystemClock),
//!     storage,
//!     &TodoConfig::default(),
//! )
//! .await;
//!
//! todos.add_todo("Buy milk", None, Some(Priority::High), user_id).await?;
//! println!("{}", todos.summary_for(user_id).await);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod actions;
pub mod config;
pub mod constants;
pub mod container;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod reducer;
pub mod state;

pub use actions::TodoAction;
pub use config::{TodoConfig, TodoLatencies};
pub use constants::TODO_STORAGE_KEY;
pub use container::{TodoContainer, TodoStore};
pub use environment::TodoEnvironment;
pub use error::{Result, TodoError};
pub use gateway::{SimulatedTodoGateway, TodoGateway};
pub use reducer::TodoReducer;
pub use state::{NewTodo, PersistedTodos, Priority, TodoId, TodoItem, TodoPatch, TodoState, TodoSummary};
