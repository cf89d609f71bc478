//! Contract of the remote agent resource.

use async_trait::async_trait;

use crate::error::Error;
use crate::types::{Agent, AgentUpdate, NewAgent};

/// CRUD surface of the remote agent collection.
///
/// Implemented over HTTP by [`AgentsClient`](crate::clients::AgentsClient)
/// and in memory by [`MockAgentResource`](crate::testing::MockAgentResource).
/// Mutation responses carry nothing the directory relies on; the full list is
/// re-fetched after every successful mutation instead.
#[async_trait]
pub trait AgentResource: Send + Sync {
    /// Fetch every agent, in the order the resource returns them.
    async fn list(&self) -> Result<Vec<Agent>, Error>;

    /// Create an agent.
    async fn create(&self, agent: &NewAgent) -> Result<(), Error>;

    /// Update the agent stored under `id`.
    async fn update(&self, id: &str, update: &AgentUpdate) -> Result<(), Error>;

    /// Delete the agent stored under `id`.
    async fn delete(&self, id: &str) -> Result<(), Error>;
}
