//! Remote write capability.
//!
//! Every mutating todo command is confirmed by a [`TodoGateway`] before the
//! list changes. [`SimulatedTodoGateway`] stands in for a backend: it waits
//! for a fixed latency and then accepts, or rejects everything when built
//! with [`SimulatedTodoGateway::failing`].

use crate::config::TodoLatencies;
use crate::error::{Result, TodoError};
use crate::state::{NewTodo, TodoId, TodoPatch};
use std::future::Future;

/// Backend that confirms todo writes.
///
/// Implementations must be cheap to clone; the reducer clones the gateway
/// into every effect it starts.
pub trait TodoGateway: Clone + Send + Sync + 'static {
    /// Confirm creation of a todo.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::AddFailed`] if the write is rejected.
    fn add(&self, draft: &NewTodo) -> impl Future<Output = Result<()>> + Send;

    /// Confirm an update.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::UpdateFailed`] if the write is rejected.
    fn update(&self, id: &TodoId, patch: &TodoPatch) -> impl Future<Output = Result<()>> + Send;

    /// Confirm a deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::DeleteFailed`] if the write is rejected.
    fn delete(&self, id: &TodoId) -> impl Future<Output = Result<()>> + Send;
}

/// In-process [`TodoGateway`] with canned latencies.
#[derive(Debug, Clone, Default)]
pub struct SimulatedTodoGateway {
    latencies: TodoLatencies,
    failing: bool,
}

impl SimulatedTodoGateway {
    /// Create a gateway that accepts every write.
    #[must_use]
    pub const fn new(latencies: TodoLatencies) -> Self {
        Self {
            latencies,
            failing: false,
        }
    }

    /// Create a gateway that rejects every write.
    #[must_use]
    pub const fn failing(latencies: TodoLatencies) -> Self {
        Self {
            latencies,
            failing: true,
        }
    }

    async fn respond(&self, latency: std::time::Duration, error: TodoError) -> Result<()> {
        tokio::time::sleep(latency).await;
        if self.failing { Err(error) } else { Ok(()) }
    }
}

impl TodoGateway for SimulatedTodoGateway {
    async fn add(&self, _draft: &NewTodo) -> Result<()> {
        self.respond(self.latencies.add, TodoError::AddFailed).await
    }

    async fn update(&self, _id: &TodoId, _patch: &TodoPatch) -> Result<()> {
        self.respond(self.latencies.update, TodoError::UpdateFailed).await
    }

    async fn delete(&self, _id: &TodoId) -> Result<()> {
        self.respond(self.latencies.delete, TodoError::DeleteFailed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_failing_gateway_reports_operation() {
        let gateway = SimulatedTodoGateway::failing(TodoLatencies::uniform(Duration::ZERO));
        let id = TodoId::new("1");

        assert_eq!(gateway.add(&NewTodo::new("t", "u")).await, Err(TodoError::AddFailed));
        assert_eq!(
            gateway.update(&id, &TodoPatch::new()).await,
            Err(TodoError::UpdateFailed)
        );
        assert_eq!(gateway.delete(&id).await, Err(TodoError::DeleteFailed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_takes_configured_latency() {
        let gateway = SimulatedTodoGateway::default();
        let start = tokio::time::Instant::now();
        assert_eq!(gateway.add(&NewTodo::new("t", "u")).await, Ok(()));
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
