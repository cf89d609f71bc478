//! Agent directory for Rust
//!
//! State manager for a directory of field inspection agents kept on a remote
//! CRUD resource. It holds the canonical collection and a filtered view of it,
//! validates and normalizes drafts, resynchronizes after every mutation and
//! tracks which notice or form the presentation layer should show.
//!
//! # Quick Start
//!
//! ```rust
//! use agent_directory::{validate, AgentDraft};
//!
//! let draft = AgentDraft {
//!     agent_id: "agent_jane_1234".to_string(),
//!     name: "Jane Doe".to_string(),
//!     phone: "+2348012345678".to_string(),
//!     email: "jane@example.com".to_string(),
//!     ..Default::default()
//! };
//! assert!(validate(&draft).is_empty());
//! ```

pub mod cache;
pub mod client;
pub mod clients;
pub mod config;
pub mod directory;
pub mod draft;
pub mod error;
pub mod interaction;
pub mod logging;
pub mod resource;
pub mod sync;
pub mod testing;
pub mod transport;
pub mod types;
pub mod validation;

// Re-exports
pub use cache::{AgentFilter, DirectoryCache, DirectoryView};
pub use client::DirectoryClient;
pub use clients::AgentsClient;
pub use config::{ConfigError, DirectoryConfig};
pub use directory::{AgentDirectory, DELETE_PROMPT};
pub use draft::{format_phone_input, AgentDraft};
pub use error::{Error, ServerError};
pub use interaction::{InteractionMachine, InteractionState};
pub use logging::init_tracing;
pub use resource::AgentResource;
pub use sync::{MutationKind, MutationOutcome, SyncController, LOAD_FAILURE_MESSAGE};
pub use transport::{HttpTransport, RetryConfig};
pub use types::{Agent, AgentStatus, AgentUpdate, NewAgent};
pub use validation::{
    is_valid_email, is_valid_phone, validate, DraftField, FieldError, ValidationErrors,
    ValidationMode,
};
