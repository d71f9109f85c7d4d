//! End-to-end tests for the composed application.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;
use todoapp::{App, AppConfig, AppError, FileStorage};
use todoapp_auth::{AUTH_STORAGE_KEY, UserId};
use todoapp_testing::InMemoryStorage;
use todoapp_todos::{Priority, TODO_STORAGE_KEY, TodoError};

const FLUSH: Duration = Duration::from_secs(5);

fn instant_config() -> AppConfig {
    AppConfig::default().with_latency_scale(0.0)
}

async fn in_memory_app() -> (App, Arc<InMemoryStorage>) {
    let storage = Arc::new(InMemoryStorage::new());
    let app = App::bootstrap(&instant_config(), storage.clone()).await;
    (app, storage)
}

#[tokio::test]
async fn test_add_requires_sign_in() {
    let (app, storage) = in_memory_app().await;

    let result = app.add_todo("Buy milk", None, None).await;

    assert!(matches!(result, Err(TodoError::NotSignedIn)));
    assert_eq!(app.todos().state().await.count(), 0);
    assert!(app.my_todos().await.is_empty());
    assert_eq!(app.my_summary().await.total, 0);
    app.flush(FLUSH).await.unwrap();
    assert!(storage.write_log().is_empty());
}

#[tokio::test]
async fn test_todos_are_owned_by_the_signed_in_user() {
    let (app, _storage) = in_memory_app().await;
    app.auth().sign_in("ada@example.com", "secret1").await.unwrap();

    app.add_todo("Buy milk", Some("2 litres"), Some(Priority::High))
        .await
        .unwrap();

    let user = app.auth().current_user().await.unwrap();
    assert_eq!(user.id, UserId::for_email("ada@example.com"));

    let mine = app.my_todos().await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].user_id, user.id.as_str());
    assert_eq!(mine[0].priority, Priority::High);
    assert_eq!(app.my_summary().await.to_string(), "1 tasks • 0 completed");
}

#[tokio::test]
async fn test_queries_are_scoped_per_user() {
    let (app, _storage) = in_memory_app().await;

    app.auth().sign_in("ada@example.com", "secret1").await.unwrap();
    app.add_todo("Ada one", None, None).await.unwrap();
    app.add_todo("Ada two", None, None).await.unwrap();
    let first = app.my_todos().await[0].id.clone();
    app.todos().toggle_todo(&first).await.unwrap();
    app.auth().sign_out().await.unwrap();

    assert!(app.my_todos().await.is_empty());

    app.auth().sign_in("bob@example.com", "secret1").await.unwrap();
    assert!(app.my_todos().await.is_empty());
    app.add_todo("Bob one", None, None).await.unwrap();
    let bob: Vec<String> = app.my_todos().await.into_iter().map(|t| t.title).collect();
    assert_eq!(bob, vec!["Bob one".to_string()]);
    app.auth().sign_out().await.unwrap();

    app.auth().sign_in("Ada@Example.com ", "secret1").await.unwrap();
    let ada: Vec<String> = app.my_todos().await.into_iter().map(|t| t.title).collect();
    assert_eq!(ada, vec!["Ada one".to_string(), "Ada two".to_string()]);
    assert_eq!(app.my_summary().await.to_string(), "2 tasks • 1 completed");
    assert_eq!(app.todos().state().await.count(), 3);
}

#[tokio::test]
async fn test_both_slices_share_one_backend() {
    let (app, storage) = in_memory_app().await;
    app.auth().sign_in("ada@example.com", "secret1").await.unwrap();
    app.add_todo("Buy milk", None, None).await.unwrap();
    app.flush(FLUSH).await.unwrap();

    let auth: serde_json::Value =
        serde_json::from_str(&storage.get_text(AUTH_STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(auth["state"]["user"]["email"], "ada@example.com");

    let todos: serde_json::Value =
        serde_json::from_str(&storage.get_text(TODO_STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(todos["state"]["todos"][0]["title"], "Buy milk");
}

#[tokio::test]
async fn test_state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = instant_config().with_storage_dir(dir.path());

    let added = {
        let storage = FileStorage::open(&config.storage_dir).await.unwrap();
        let app = App::bootstrap(&config, Arc::new(storage)).await;
        app.auth().sign_in("ada@example.com", "secret1").await.unwrap();
        app.add_todo("Buy milk", None, Some(Priority::Low)).await.unwrap();
        app.add_todo("Call the bank", None, None).await.unwrap();
        app.shutdown(FLUSH).await.unwrap();
        app.my_todos().await
    };

    let storage = FileStorage::open(&config.storage_dir).await.unwrap();
    let restarted = App::bootstrap(&config, Arc::new(storage)).await;

    assert!(restarted.auth().is_authenticated().await);
    assert_eq!(restarted.my_todos().await, added);

    restarted.add_todo("Third", None, None).await.unwrap();
    let ids: Vec<_> = restarted.my_todos().await.into_iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 3);
    assert_ne!(ids[2], ids[0]);
    assert_ne!(ids[2], ids[1]);
}

#[tokio::test]
async fn test_shutdown_rejects_operations() {
    let (app, _storage) = in_memory_app().await;
    app.auth().sign_in("ada@example.com", "secret1").await.unwrap();
    app.shutdown(FLUSH).await.unwrap();

    let result = app.add_todo("Late", None, None).await;
    assert!(matches!(result, Err(TodoError::Store(_))));

    let flushed: Result<(), AppError> = app.flush(FLUSH).await;
    assert!(flushed.is_ok());
}
