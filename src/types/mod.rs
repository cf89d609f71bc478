//! Data model types.

pub mod agents;

pub use agents::{Agent, AgentStatus, AgentUpdate, NewAgent};
