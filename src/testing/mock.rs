//! Mock agent resource for testing.
//!
//! Provides a `MockAgentResource` that implements [`AgentResource`] without
//! making network calls. Every call is recorded before it is answered, and
//! calls can be held open to observe in-flight behavior.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::error::{Error, ServerError};
use crate::resource::AgentResource;
use crate::types::{Agent, AgentStatus, AgentUpdate, NewAgent};

/// Record of a method call.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Method name (e.g., "agents.list", "agents.delete")
    pub method: String,
    /// Arguments passed to the method
    pub args: Vec<String>,
    /// Timestamp of the call
    pub timestamp: DateTime<Utc>,
}

impl MockCall {
    /// Create a new mock call record.
    pub fn new(method: &str, args: Vec<String>) -> Self {
        Self {
            method: method.to_string(),
            args,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
enum MockFailure {
    Server(ServerError),
    Transport(String),
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub struct MockResponse<T: Clone> {
    /// The data to return
    pub data: Option<T>,
    failure: Option<MockFailure>,
    /// Number of times this response has been used
    pub call_count: u32,
}

impl<T: Clone> Default for MockResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            failure: None,
            call_count: 0,
        }
    }
}

impl<T: Clone> MockResponse<T> {
    /// Create a new mock response with data.
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Create a response that fails with a non-2xx status and optional detail.
    pub fn with_error(status: u16, detail: Option<&str>) -> Self {
        Self {
            failure: Some(MockFailure::Server(ServerError::new(
                status,
                detail.map(String::from),
            ))),
            ..Self::default()
        }
    }

    /// Create a response that fails before any status is received.
    pub fn with_transport_error(message: &str) -> Self {
        Self {
            failure: Some(MockFailure::Transport(message.to_string())),
            ..Self::default()
        }
    }

    /// Get the result, returning either the configured data or error.
    fn get_result(&mut self, default: T) -> Result<T, Error> {
        self.call_count += 1;
        match &self.failure {
            Some(MockFailure::Server(err)) => Err(Error::Server(err.clone())),
            Some(MockFailure::Transport(message)) => Err(Error::Transport(message.clone())),
            None => Ok(self.data.clone().unwrap_or(default)),
        }
    }
}

/// A fully populated agent for fixtures.
#[must_use]
pub fn mock_agent(id: &str, name: &str) -> Agent {
    let slug = name.to_lowercase().replace(' ', "_");
    Agent {
        id: id.to_string(),
        agent_id: format!("agent_{slug}"),
        name: name.to_string(),
        phone: "+2348012345678".to_string(),
        email: format!("{}@example.com", slug.replace('_', ".")),
        status: AgentStatus::Active,
        zone: None,
        specializations: vec![],
        experience_years: None,
        rating: None,
        total_inspections: None,
        created_at: None,
        updated_at: None,
    }
}

/// Mock implementation of the remote agent resource.
///
/// Cloning shares state, so a test can keep a handle for inspection after
/// moving a clone into the code under test.
#[derive(Clone, Default)]
pub struct MockAgentResource {
    calls: Arc<Mutex<Vec<MockCall>>>,
    list_response: Arc<Mutex<MockResponse<Vec<Agent>>>>,
    create_response: Arc<Mutex<MockResponse<()>>>,
    update_response: Arc<Mutex<MockResponse<()>>>,
    delete_response: Arc<Mutex<MockResponse<()>>>,
    held: Arc<AtomicBool>,
    gate: Arc<Notify>,
}

impl MockAgentResource {
    /// Create a mock whose list is empty and whose mutations succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the response for list() calls.
    pub fn configure_list(&self, response: MockResponse<Vec<Agent>>) {
        *self.list_response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Configure the response for create() calls.
    pub fn configure_create(&self, response: MockResponse<()>) {
        *self.create_response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Configure the response for update() calls.
    pub fn configure_update(&self, response: MockResponse<()>) {
        *self.update_response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Configure the response for delete() calls.
    pub fn configure_delete(&self, response: MockResponse<()>) {
        *self.delete_response.lock().unwrap_or_else(|e| e.into_inner()) = response;
    }

    /// Hold every subsequent call open (after recording it) until
    /// [`release_requests`](Self::release_requests).
    pub fn hold_requests(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    /// Let held calls complete.
    pub fn release_requests(&self) {
        self.held.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MockCall::new(method, args));
    }

    async fn wait_for_release(&self) {
        loop {
            let released = self.gate.notified();
            if !self.held.load(Ordering::SeqCst) {
                return;
            }
            released.await;
        }
    }

    /// Check if a method was called.
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    /// Get the number of times a method was called.
    #[must_use]
    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Get all calls, optionally filtered by method.
    #[must_use]
    pub fn get_calls(&self, method: Option<&str>) -> Vec<MockCall> {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        match method {
            Some(m) => calls.iter().filter(|c| c.method == m).cloned().collect(),
            None => calls.clone(),
        }
    }

    /// Reset all recorded calls.
    pub fn reset(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl AgentResource for MockAgentResource {
    async fn list(&self) -> Result<Vec<Agent>, Error> {
        self.record_call("agents.list", vec![]);
        self.wait_for_release().await;
        self.list_response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_result(Vec::new())
    }

    async fn create(&self, agent: &NewAgent) -> Result<(), Error> {
        self.record_call(
            "agents.create",
            vec![agent.agent_id.clone(), agent.name.clone()],
        );
        self.wait_for_release().await;
        self.create_response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_result(())
    }

    async fn update(&self, id: &str, changes: &AgentUpdate) -> Result<(), Error> {
        self.record_call("agents.update", vec![id.to_string(), changes.name.clone()]);
        self.wait_for_release().await;
        self.update_response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_result(())
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        self.record_call("agents.delete", vec![id.to_string()]);
        self.wait_for_release().await;
        self.delete_response
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get_result(())
    }
}
