//! # TodoApp
//!
//! Composition root for the TodoApp state containers. Wires the
//! [`AuthContainer`](todoapp_auth::AuthContainer) and
//! [`TodoContainer`](todoapp_todos::TodoContainer) to one storage backend
//! and attributes todo writes to the signed-in user.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use todoapp::{App, AppConfig, FileStorage};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AppConfig::from_env()?;
//! let storage = FileStorage::open(&config.storage_dir).await?;
//! let app = App::bootstrap(&config, Arc::new(storage)).await;
//!
//! app.auth().sign_in("ada@example.com", "secret1").await?;
//! app.add_todo("Buy milk", None, None).await?;
//! println!("{}", app.my_summary().await);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

pub mod app;
pub mod config;
pub mod storage;
pub mod telemetry;

pub use app::{App, AppError};
pub use config::AppConfig;
pub use storage::FileStorage;
