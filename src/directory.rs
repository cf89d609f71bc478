//! Agent directory.
//!
//! [`AgentDirectory`] is the surface the presentation layer drives. It owns
//! the cache, the interaction state and the pending delete confirmation, and
//! routes every user intent through the sync controller.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::cache::{AgentFilter, DirectoryCache, DirectoryView};
use crate::client::DirectoryClient;
use crate::clients::AgentsClient;
use crate::config::DirectoryConfig;
use crate::draft::AgentDraft;
use crate::error::Error;
use crate::interaction::{InteractionMachine, InteractionState};
use crate::resource::AgentResource;
use crate::sync::{MutationKind, MutationOutcome, SyncController};
use crate::types::{Agent, AgentStatus};
use crate::validation::{self, ValidationErrors, ValidationMode};

/// Prompt shown before a delete is confirmed.
pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this agent? This action cannot be undone.";

/// Directory state container and entry points.
///
/// All methods take `&self`; share it behind an `Arc` to issue intents while
/// another call is in flight.
///
/// # Example
///
/// ```rust,ignore
/// use agent_directory::{AgentDirectory, DirectoryConfig};
///
/// let directory = AgentDirectory::connect(&DirectoryConfig::from_env()?)?;
/// directory.load().await?;
/// directory.set_search_term("jane");
/// let view = directory.view();
/// ```
pub struct AgentDirectory<R> {
    sync: SyncController<R>,
    cache: Arc<Mutex<DirectoryCache>>,
    interaction: Mutex<InteractionMachine>,
    pending_delete: Mutex<Option<String>>,
    validation_mode: ValidationMode,
}

impl AgentDirectory<AgentsClient> {
    /// Build a directory backed by the HTTP resource described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be created.
    pub fn connect(config: &DirectoryConfig) -> Result<Self, Error> {
        let client = DirectoryClient::from_config(config)?;
        Ok(Self::new(client.into_agents(), config))
    }

    /// Build a directory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value or the transport
    /// cannot be created.
    pub fn from_env() -> Result<Self, Error> {
        let config =
            DirectoryConfig::from_env().map_err(|e| Error::Configuration(e.to_string()))?;
        Self::connect(&config)
    }
}

impl<R: AgentResource> AgentDirectory<R> {
    pub fn new(resource: R, config: &DirectoryConfig) -> Self {
        let cache = Arc::new(Mutex::new(DirectoryCache::new()));
        Self {
            sync: SyncController::new(resource, Arc::clone(&cache), config.timeout),
            cache,
            interaction: Mutex::new(InteractionMachine::new()),
            pending_delete: Mutex::new(None),
            validation_mode: config.validation_mode,
        }
    }

    fn cache(&self) -> MutexGuard<'_, DirectoryCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn interaction(&self) -> MutexGuard<'_, InteractionMachine> {
        self.interaction.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn pending_delete(&self) -> MutexGuard<'_, Option<String>> {
        self.pending_delete.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[must_use]
    pub fn resource(&self) -> &R {
        self.sync.resource()
    }

    /// What to render in place of the list.
    #[must_use]
    pub fn view(&self) -> DirectoryView {
        self.cache().current_view()
    }

    /// The canonical collection as of the last successful load.
    #[must_use]
    pub fn agents(&self) -> Vec<Agent> {
        self.cache().agents().to_vec()
    }

    /// Distinct zones, sorted, for populating the zone filter.
    #[must_use]
    pub fn zones(&self) -> Vec<String> {
        self.cache().zones()
    }

    #[must_use]
    pub fn filter(&self) -> AgentFilter {
        self.cache().filter().clone()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.sync.is_busy()
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        self.interaction().state().clone()
    }

    #[must_use]
    pub fn validation_mode(&self) -> ValidationMode {
        self.validation_mode
    }

    /// Check a draft without submitting it, e.g. when a field loses focus.
    #[must_use]
    pub fn validate(&self, draft: &AgentDraft) -> ValidationErrors {
        validation::validate(draft)
    }

    /// Fetch the collection. A failure degrades the view but leaves the
    /// interaction state alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] when the fetch fails.
    pub async fn load(&self) -> Result<usize, Error> {
        self.sync.reload().await
    }

    /// Under [`ValidationMode::Enforce`] a draft with problems is refused
    /// and the problems are shown as an error notice.
    fn admit(&self, kind: MutationKind, draft: &AgentDraft) -> Result<(), Error> {
        let errors = validation::validate(draft);
        if errors.is_empty() {
            return Ok(());
        }
        match self.validation_mode {
            ValidationMode::Advisory => {
                warn!(%errors, "submitting draft with validation problems");
                Ok(())
            }
            ValidationMode::Enforce => {
                let error = Error::Validation(errors);
                self.interaction().show_error(kind.failure_message(&error));
                Err(error)
            }
        }
    }

    fn settle(
        &self,
        kind: MutationKind,
        result: Result<MutationOutcome, Error>,
    ) -> Result<MutationOutcome, Error> {
        match &result {
            Ok(outcome) => self.interaction().show_success(outcome.message.clone()),
            Err(error) => self.interaction().show_error(kind.failure_message(error)),
        }
        result
    }

    /// Create an agent from a draft and resynchronize.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] under [`ValidationMode::Enforce`] when
    /// the draft has problems, or the failure of the create call.
    pub async fn submit_create(&self, draft: &AgentDraft) -> Result<MutationOutcome, Error> {
        self.admit(MutationKind::Create, draft)?;
        let result = self.sync.create(draft).await;
        self.settle(MutationKind::Create, result)
    }

    /// Open the edit form on a snapshot of the agent stored under `id` and
    /// return the prefilled draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAgent`] if `id` is not in the canonical
    /// collection.
    pub fn request_edit(&self, id: &str) -> Result<AgentDraft, Error> {
        let agent = self
            .cache()
            .find(id)
            .cloned()
            .ok_or_else(|| Error::UnknownAgent(id.to_string()))?;
        let draft = AgentDraft::from(&agent);
        self.interaction().begin_edit(agent);
        Ok(draft)
    }

    /// Close the edit form without submitting. Returns false if none was open.
    pub fn cancel_edit(&self) -> bool {
        self.interaction().cancel_edit()
    }

    /// Submit changes to the agent stored under `id` and resynchronize.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] under [`ValidationMode::Enforce`] when
    /// the draft has problems, or the failure of the update call.
    pub async fn submit_edit(
        &self,
        id: &str,
        draft: &AgentDraft,
    ) -> Result<MutationOutcome, Error> {
        self.admit(MutationKind::Update, draft)?;
        let result = self.sync.update(id, draft).await;
        self.settle(MutationKind::Update, result)
    }

    /// Ask for confirmation before deleting `id`. Replaces any earlier
    /// pending request.
    pub fn request_delete(&self, id: &str) -> &'static str {
        debug!(id, "delete requested");
        *self.pending_delete() = Some(id.to_string());
        DELETE_PROMPT
    }

    /// Withdraw a pending delete request.
    pub fn cancel_delete(&self) -> bool {
        self.pending_delete().take().is_some()
    }

    /// Delete `id` after the user confirmed the prompt from
    /// [`request_delete`](Self::request_delete).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeleteNotRequested`], without issuing a request, if
    /// `id` is not the pending one; otherwise the failure of the delete call.
    pub async fn confirm_delete(&self, id: &str) -> Result<MutationOutcome, Error> {
        {
            let mut pending = self.pending_delete();
            if pending.as_deref() != Some(id) {
                warn!(id, "delete confirmed without a matching request");
                return Err(Error::DeleteNotRequested(id.to_string()));
            }
            *pending = None;
        }
        let result = self.sync.remove(id).await;
        self.settle(MutationKind::Delete, result)
    }

    /// Replace the whole predicate.
    pub fn set_filter(&self, filter: AgentFilter) {
        self.cache().set_filter(filter);
    }

    pub fn set_search_term(&self, term: &str) {
        let mut cache = self.cache();
        let filter = cache.filter().clone().with_search(term);
        cache.set_filter(filter);
    }

    /// `None` or an empty string clears the zone filter.
    pub fn set_zone_filter(&self, zone: Option<&str>) {
        let mut cache = self.cache();
        let filter = cache.filter().clone().with_zone(zone);
        cache.set_filter(filter);
    }

    pub fn set_status_filter(&self, status: Option<AgentStatus>) {
        let mut cache = self.cache();
        let filter = cache.filter().clone().with_status(status);
        cache.set_filter(filter);
    }

    /// Close a visible notice. Returns false if none was visible.
    pub fn dismiss_notice(&self) -> bool {
        self.interaction().dismiss()
    }
}
