//! TodoApp demo binary
//!
//! Walks one user through sign-up, confirmation and a handful of todo
//! operations against the simulated backends, persisting to
//! `TODOAPP_STORAGE_DIR`. Run it twice to see the state survive a restart.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use todoapp::{App, AppConfig, FileStorage, telemetry};
use todoapp_todos::{Priority, TodoPatch};

const DEMO_EMAIL: &str = "demo@todoapp.dev";
const DEMO_PASSWORD: &str = "demo-password";
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init(&config.log_filter)?;

    let storage = FileStorage::open(&config.storage_dir)
        .await
        .with_context(|| format!("opening {}", config.storage_dir.display()))?;
    let app = App::bootstrap(&config, Arc::new(storage)).await;

    println!("=== TodoApp ===\n");

    match app.auth().current_user().await {
        Some(user) => println!("Welcome back, {} <{}>", user.name, user.email),
        None => {
            println!(">>> Signing up {DEMO_EMAIL}");
            app.auth()
                .sign_up(DEMO_EMAIL, DEMO_PASSWORD, Some("Demo"))
                .await?;
            let auth = app.auth().state().await;
            println!("Mode: {}, pending: {:?}", auth.mode, auth.email_pending_verification);

            println!("\n>>> Confirming email");
            app.auth().confirm_email("demo-token").await?;

            println!("\n>>> Signing in");
            app.auth().sign_in(DEMO_EMAIL, DEMO_PASSWORD).await?;
            if let Some(error) = app.auth().state().await.error {
                anyhow::bail!("sign-in failed: {error}");
            }
            if let Some(user) = app.auth().current_user().await {
                println!("Signed in as {} ({})", user.email, user.id);
            }
        },
    }

    println!("\n>>> Adding todos");
    app.add_todo("Buy milk", Some("Semi-skimmed, 2 litres"), Some(Priority::High))
        .await?;
    app.add_todo("Water the plants", None, Some(Priority::Low)).await?;
    app.add_todo("Call the bank", None, None).await?;
    print_todos(&app).await;

    let mine = app.my_todos().await;
    let [.., first, second, third] = mine.as_slice() else {
        anyhow::bail!("expected at least three todos, found {}", mine.len());
    };

    println!("\n>>> Completing {:?}", first.title);
    app.todos().toggle_todo(&first.id).await?;

    println!(">>> Renaming {:?}", second.title);
    app.todos()
        .update_todo(&second.id, TodoPatch::new().title("Water the garden"))
        .await?;

    println!(">>> Deleting {:?}", third.title);
    app.todos().delete_todo(&third.id).await?;

    print_todos(&app).await;

    println!("\n>>> Signing out");
    app.auth().sign_out().await?;
    println!("Visible after sign-out: {}", app.my_summary().await);

    app.shutdown(SHUTDOWN_TIMEOUT).await?;
    println!("\n=== Done. State saved to {} ===", config.storage_dir.display());
    Ok(())
}

async fn print_todos(app: &App) {
    println!("\n{}", app.my_summary().await);
    for todo in app.my_todos().await {
        let mark = if todo.completed { 'x' } else { ' ' };
        println!("  [{mark}] {:<20} {:<6} {}", todo.title, todo.priority, todo.description);
    }
}
