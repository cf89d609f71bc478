//! Resource clients.

pub mod agents;

pub use agents::AgentsClient;
