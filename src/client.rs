//! Directory client.
//!
//! Wires the HTTP transport to the resource clients.

use std::sync::Arc;
use std::time::Duration;

use crate::clients::AgentsClient;
use crate::config::{DirectoryConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::Error;
use crate::transport::{HttpTransport, RetryConfig};

/// Entry point to the remote agent resource over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use agent_directory::{AgentResource, DirectoryClient};
///
/// let client = DirectoryClient::new(Some("http://localhost:8000/api"), None, None)?;
/// let agents = client.into_agents().list().await?;
/// ```
pub struct DirectoryClient {
    transport: Arc<HttpTransport>,
    agents: AgentsClient,
}

impl DirectoryClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL for API requests (default: <http://localhost:8000/api>)
    /// * `timeout` - Request timeout (default: 30 seconds)
    /// * `retry_config` - Configuration for retry behavior (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn new(
        base_url: Option<&str>,
        timeout: Option<Duration>,
        retry_config: Option<RetryConfig>,
    ) -> Result<Self, Error> {
        let base_url = base_url.unwrap_or(DEFAULT_BASE_URL);
        let timeout = timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let transport = Arc::new(HttpTransport::new(base_url, timeout, retry_config)?);

        Ok(Self {
            agents: AgentsClient::new(Arc::clone(&transport)),
            transport,
        })
    }

    /// Create a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn from_config(config: &DirectoryConfig) -> Result<Self, Error> {
        Self::new(
            Some(&config.base_url),
            Some(config.timeout),
            Some(config.retry.clone()),
        )
    }

    /// Create a client from environment variables (see
    /// [`DirectoryConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, Error> {
        let config =
            DirectoryConfig::from_env().map_err(|e| Error::Configuration(e.to_string()))?;
        Self::from_config(&config)
    }

    /// Get the underlying HTTP transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    /// Get the agents client.
    #[must_use]
    pub fn agents(&self) -> &AgentsClient {
        &self.agents
    }

    /// Take the agents client, e.g. to hand it to an
    /// [`AgentDirectory`](crate::directory::AgentDirectory).
    #[must_use]
    pub fn into_agents(self) -> AgentsClient {
        self.agents
    }
}
