//! Agents resource client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Error;
use crate::resource::AgentResource;
use crate::transport::HttpTransport;
use crate::types::{Agent, AgentUpdate, NewAgent};

/// Collection path below the base URL. The trailing empty segment keeps the
/// trailing slash the resource expects on its collection endpoint.
const COLLECTION: [&str; 2] = ["agents", ""];

/// HTTP client for the `/agents/` resource.
pub struct AgentsClient {
    transport: Arc<HttpTransport>,
}

impl AgentsClient {
    /// Create a new agents client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AgentResource for AgentsClient {
    /// `GET /agents/`
    async fn list(&self) -> Result<Vec<Agent>, Error> {
        self.transport.get(&COLLECTION).await
    }

    /// `POST /agents/`. The echoed record is discarded.
    async fn create(&self, agent: &NewAgent) -> Result<(), Error> {
        self.transport
            .send(Method::POST, &COLLECTION, Some(agent))
            .await
            .map(drop)
    }

    /// `PUT /agents/{id}`
    async fn update(&self, id: &str, update: &AgentUpdate) -> Result<(), Error> {
        self.transport
            .send(Method::PUT, &["agents", id], Some(update))
            .await
            .map(drop)
    }

    /// `DELETE /agents/{id}`
    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport
            .send(Method::DELETE, &["agents", id], None::<&()>)
            .await
            .map(drop)
    }
}
