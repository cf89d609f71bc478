//! Sync controller.
//!
//! Runs the four CRUD verbs against an [`AgentResource`], normalizes drafts on
//! the way out and resynchronizes the [`DirectoryCache`] with a full re-fetch
//! after every successful mutation. The re-fetch is only issued once the
//! mutation's own success has been observed.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::{info, info_span, warn, Instrument};

use crate::cache::DirectoryCache;
use crate::draft::AgentDraft;
use crate::error::Error;
use crate::resource::AgentResource;
use crate::types::Agent;

/// Shown in place of the list when the collection cannot be fetched.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load agents. Please try again later.";

/// Which mutation an outcome or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    fn verb(self) -> &'static str {
        match self {
            Self::Create => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Notice text for a failed mutation, e.g.
    /// `Failed to add agent: agent_id already exists`.
    #[must_use]
    pub fn failure_message(self, error: &Error) -> String {
        let headline = format!("Failed to {} agent", self.verb());
        match error.reason() {
            Some(reason) => format!("{headline}: {reason}"),
            None => headline,
        }
    }
}

/// A mutation the remote resource accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    /// Notice text naming what happened
    pub message: String,
    /// Whether the follow-up re-fetch succeeded; when false the cache is
    /// stale until the next successful load
    pub resynced: bool,
}

/// Counts in-flight calls; released on drop so an abandoned future never
/// leaves the controller busy.
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct SyncController<R> {
    resource: R,
    cache: Arc<Mutex<DirectoryCache>>,
    in_flight: AtomicUsize,
    timeout: Duration,
}

impl<R: AgentResource> SyncController<R> {
    /// Create a controller that writes into `cache`.
    ///
    /// `timeout` bounds every individual call to the resource; expiry is
    /// reported as a transport error.
    pub fn new(resource: R, cache: Arc<Mutex<DirectoryCache>>, timeout: Duration) -> Self {
        Self {
            resource,
            cache,
            in_flight: AtomicUsize::new(0),
            timeout,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &R {
        &self.resource
    }

    /// True while any call is outstanding. The presentation layer should
    /// disable its submit controls meanwhile.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, Error>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Transport(format!(
                "Request timed out after {}ms",
                self.timeout.as_millis()
            ))),
        }
    }

    /// Fetch the full collection without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] wrapping the transport or server failure.
    pub async fn fetch_all(&self) -> Result<Vec<Agent>, Error> {
        let _busy = BusyGuard::enter(&self.in_flight);
        self.bounded(self.resource.list())
            .await
            .map_err(|e| Error::Load(Box::new(e)))
    }

    /// Fetch the full collection and load it into the cache.
    ///
    /// On failure the cache keeps its stale collection and reports the
    /// degraded state in its view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] when the fetch fails.
    pub async fn reload(&self) -> Result<usize, Error> {
        match self.fetch_all().instrument(info_span!("reload")).await {
            Ok(agents) => {
                let count = agents.len();
                self.lock_cache().load(agents);
                info!(count, "directory reloaded");
                Ok(count)
            }
            Err(error) => {
                warn!(%error, "directory reload failed");
                self.lock_cache().record_load_failure(LOAD_FAILURE_MESSAGE);
                Err(error)
            }
        }
    }

    /// Normalize and submit a new agent, then resynchronize.
    ///
    /// # Errors
    ///
    /// Returns the transport or server failure of the create call itself. A
    /// failed resync is not an error; see [`MutationOutcome::resynced`].
    pub async fn create(&self, draft: &AgentDraft) -> Result<MutationOutcome, Error> {
        let payload = draft.to_new_agent();
        let span = info_span!("create_agent", agent_id = %payload.agent_id);
        async {
            let _busy = BusyGuard::enter(&self.in_flight);
            self.bounded(self.resource.create(&payload)).await?;
            info!(name = %payload.name, "agent created");
            Ok(self
                .finish(
                    MutationKind::Create,
                    format!("Agent \"{}\" added successfully!", payload.name),
                )
                .await)
        }
        .instrument(span)
        .await
    }

    /// Normalize and submit changes to the agent stored under `id`, then
    /// resynchronize.
    ///
    /// # Errors
    ///
    /// Returns the transport or server failure of the update call itself.
    pub async fn update(&self, id: &str, draft: &AgentDraft) -> Result<MutationOutcome, Error> {
        let payload = draft.to_update();
        async {
            let _busy = BusyGuard::enter(&self.in_flight);
            self.bounded(self.resource.update(id, &payload)).await?;
            info!("agent updated");
            Ok(self
                .finish(MutationKind::Update, "Agent updated successfully!".to_string())
                .await)
        }
        .instrument(info_span!("update_agent", id))
        .await
    }

    /// Delete the agent stored under `id`, then resynchronize.
    ///
    /// Callers gate this behind an explicit confirmation; see
    /// [`AgentDirectory::confirm_delete`](crate::directory::AgentDirectory::confirm_delete).
    ///
    /// # Errors
    ///
    /// Returns the transport or server failure of the delete call itself.
    pub async fn remove(&self, id: &str) -> Result<MutationOutcome, Error> {
        async {
            let _busy = BusyGuard::enter(&self.in_flight);
            self.bounded(self.resource.delete(id)).await?;
            info!("agent deleted");
            Ok(self
                .finish(MutationKind::Delete, "Agent deleted successfully!".to_string())
                .await)
        }
        .instrument(info_span!("delete_agent", id))
        .await
    }

    async fn finish(&self, kind: MutationKind, message: String) -> MutationOutcome {
        let resynced = self.reload().await.is_ok();
        MutationOutcome {
            kind,
            message,
            resynced,
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, DirectoryCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
