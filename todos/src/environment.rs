//! Environment dependencies for the todo reducer.

use crate::constants::TODO_STORAGE_KEY;
use crate::gateway::TodoGateway;
use std::sync::Arc;
use todoapp_core::environment::Clock;
use todoapp_core::persistence::PersistenceAdapter;
use todoapp_runtime::SliceWriter;

/// Environment dependencies for the todo reducer.
///
/// # Type Parameters
///
/// - `G`: Remote write gateway
#[derive(Clone)]
pub struct TodoEnvironment<G>
where
    G: TodoGateway,
{
    /// Remote write gateway.
    pub gateway: G,
    /// Clock for ids and timestamps.
    pub clock: Arc<dyn Clock>,
    /// Ordered writer for the `{todos}` slice.
    pub slices: SliceWriter,
}

impl<G> TodoEnvironment<G>
where
    G: TodoGateway,
{
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(gateway: G, clock: Arc<dyn Clock>, storage: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            gateway,
            clock,
            slices: SliceWriter::new(storage, TODO_STORAGE_KEY),
        }
    }
}
