//! Testing utilities for the agent directory.
//!
//! Provides a mock resource and fixtures for testing code built on
//! [`AgentDirectory`](crate::directory::AgentDirectory) without a server.

mod mock;

pub use mock::{mock_agent, MockAgentResource, MockCall, MockResponse};
