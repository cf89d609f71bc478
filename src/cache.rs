//! Directory cache.
//!
//! Owns the canonical collection and the active filter. The filtered view is
//! always recomputed from scratch, never patched.

use std::collections::BTreeSet;

use tracing::debug;

use crate::types::{Agent, AgentStatus};

/// Conjunction of a text search, a zone filter and a status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    /// Lowercased search term; empty matches everything
    search: String,
    zone: Option<String>,
    status: Option<AgentStatus>,
}

impl AgentFilter {
    /// A filter that matches every agent.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = term.to_lowercase();
        self
    }

    /// Restrict to one zone. An empty selection means any zone.
    #[must_use]
    pub fn with_zone(mut self, zone: Option<&str>) -> Self {
        self.zone = zone.filter(|z| !z.is_empty()).map(String::from);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: Option<AgentStatus>) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> Option<AgentStatus> {
        self.status
    }

    #[must_use]
    pub fn matches(&self, agent: &Agent) -> bool {
        self.matches_search(agent) && self.matches_zone(agent) && self.matches_status(agent)
    }

    /// Case-insensitive substring match on name, phone, email or agent code.
    fn matches_search(&self, agent: &Agent) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [&agent.name, &agent.phone, &agent.email, &agent.agent_id]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.search))
    }

    fn matches_zone(&self, agent: &Agent) -> bool {
        match &self.zone {
            None => true,
            Some(zone) => agent.zone.as_deref() == Some(zone.as_str()),
        }
    }

    fn matches_status(&self, agent: &Agent) -> bool {
        self.status.map_or(true, |status| agent.status == status)
    }
}

/// What the presentation layer should render.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryView {
    /// Nothing has been loaded yet
    Loading,
    /// Agents matching the active filter, in collection order
    Agents(Vec<Agent>),
    /// The filter matches nothing
    NoResults,
    /// The last load failed; shown in place of the list
    Unavailable(String),
}

impl DirectoryView {
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        match self {
            Self::Agents(agents) => agents,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_no_results(&self) -> bool {
        matches!(self, Self::NoResults)
    }
}

/// Canonical collection plus the view derived from it.
#[derive(Debug, Default)]
pub struct DirectoryCache {
    agents: Vec<Agent>,
    filter: AgentFilter,
    /// Indices into `agents` that satisfy `filter`
    visible: Vec<usize>,
    loaded: bool,
    load_error: Option<String>,
}

impl DirectoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canonical collection wholesale and re-apply the filter.
    pub fn load(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
        self.loaded = true;
        self.load_error = None;
        self.recompute();
    }

    /// Replace the active filter. Never touches the network.
    ///
    /// Once a collection has loaded, this renders it again in place of a
    /// failed reload. Before that, a failed load stays visible.
    pub fn set_filter(&mut self, filter: AgentFilter) {
        self.filter = filter;
        if self.loaded {
            self.load_error = None;
        }
        self.recompute();
    }

    /// Note a failed load. The stale collection stays in place.
    pub fn record_load_failure(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    fn recompute(&mut self) {
        self.visible = self
            .agents
            .iter()
            .enumerate()
            .filter(|(_, agent)| self.filter.matches(agent))
            .map(|(i, _)| i)
            .collect();
        debug!(
            total = self.agents.len(),
            visible = self.visible.len(),
            "recomputed directory view"
        );
    }

    #[must_use]
    pub fn filter(&self) -> &AgentFilter {
        &self.filter
    }

    /// The canonical collection.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Agents passing the active filter, in collection order.
    pub fn filtered(&self) -> impl Iterator<Item = &Agent> {
        self.visible.iter().map(|&i| &self.agents[i])
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    #[must_use]
    pub fn current_view(&self) -> DirectoryView {
        if let Some(message) = &self.load_error {
            return DirectoryView::Unavailable(message.clone());
        }
        if !self.loaded {
            return DirectoryView::Loading;
        }
        if self.visible.is_empty() {
            return DirectoryView::NoResults;
        }
        DirectoryView::Agents(self.filtered().cloned().collect())
    }

    /// Look up an agent by its opaque id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    /// Distinct zones present in the collection, sorted.
    #[must_use]
    pub fn zones(&self) -> Vec<String> {
        self.agents
            .iter()
            .filter_map(|agent| agent.zone.as_deref())
            .filter(|zone| !zone.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str, name: &str, zone: Option<&str>, status: AgentStatus) -> Agent {
        Agent {
            id: id.to_string(),
            agent_id: format!("agent_{}", name.to_lowercase()),
            name: name.to_string(),
            phone: format!("+23480{id}"),
            email: format!("{}@example.com", name.to_lowercase()),
            status,
            zone: zone.map(String::from),
            specializations: vec![],
            experience_years: None,
            rating: None,
            total_inspections: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn roster() -> Vec<Agent> {
        vec![
            agent("1", "Jane", Some("Lekki"), AgentStatus::Active),
            agent("2", "Bob", Some("Ikeja"), AgentStatus::Inactive),
            agent("3", "Janet", None, AgentStatus::Active),
            agent("4", "Ada", Some("Lekki"), AgentStatus::Inactive),
        ]
    }

    fn ids(view: &DirectoryView) -> Vec<&str> {
        view.agents().iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_view_before_load_is_loading() {
        let cache = DirectoryCache::new();
        assert_eq!(cache.current_view(), DirectoryView::Loading);
    }

    #[test]
    fn test_load_shows_everything_in_order() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());

        assert_eq!(ids(&cache.current_view()), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());

        cache.set_filter(AgentFilter::all().with_search("JAN"));
        assert_eq!(ids(&cache.current_view()), vec!["1", "3"]);

        cache.set_filter(AgentFilter::all().with_search("bob@EXAMPLE"));
        assert_eq!(ids(&cache.current_view()), vec!["2"]);

        cache.set_filter(AgentFilter::all().with_search("+234804"));
        assert_eq!(ids(&cache.current_view()), vec!["4"]);

        cache.set_filter(AgentFilter::all().with_search("agent_ada"));
        assert_eq!(ids(&cache.current_view()), vec!["4"]);
    }

    #[test]
    fn test_zone_and_status_combine_with_and() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());

        cache.set_filter(AgentFilter::all().with_zone(Some("Lekki")));
        assert_eq!(ids(&cache.current_view()), vec!["1", "4"]);

        cache.set_filter(
            AgentFilter::all()
                .with_zone(Some("Lekki"))
                .with_status(Some(AgentStatus::Inactive)),
        );
        assert_eq!(ids(&cache.current_view()), vec!["4"]);

        cache.set_filter(AgentFilter::all().with_zone(Some("")));
        assert_eq!(cache.filter().zone(), None);
        assert_eq!(ids(&cache.current_view()).len(), 4);
    }

    #[test]
    fn test_no_results() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());
        cache.set_filter(AgentFilter::all().with_search("zzz"));

        assert!(cache.current_view().is_no_results());
    }

    #[test]
    fn test_filter_survives_reload() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());
        cache.set_filter(AgentFilter::all().with_status(Some(AgentStatus::Active)));

        let mut next = roster();
        next.push(agent("5", "Chidi", None, AgentStatus::Active));
        next.remove(0);
        cache.load(next);

        assert_eq!(ids(&cache.current_view()), vec!["3", "5"]);
    }

    #[test]
    fn test_load_failure_keeps_stale_collection() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());
        cache.record_load_failure("Failed to load agents. Please try again later.");

        assert_eq!(
            cache.current_view(),
            DirectoryView::Unavailable("Failed to load agents. Please try again later.".to_string())
        );
        assert_eq!(cache.agents().len(), 4);

        // Changing the filter renders the stale collection again
        cache.set_filter(AgentFilter::all().with_search("bob"));
        assert_eq!(ids(&cache.current_view()), vec!["2"]);
    }

    #[test]
    fn test_failed_first_load_survives_filter_change() {
        let mut cache = DirectoryCache::new();
        cache.record_load_failure("Failed to load agents. Please try again later.");

        cache.set_filter(AgentFilter::all().with_search("jane"));
        assert_eq!(
            cache.current_view(),
            DirectoryView::Unavailable("Failed to load agents. Please try again later.".to_string())
        );

        cache.load(roster());
        assert_eq!(ids(&cache.current_view()), vec!["1", "3"]);
    }

    #[test]
    fn test_find_and_zones() {
        let mut cache = DirectoryCache::new();
        cache.load(roster());

        assert_eq!(cache.find("3").map(|a| a.name.as_str()), Some("Janet"));
        assert!(cache.find("99").is_none());
        assert_eq!(cache.zones(), vec!["Ikeja", "Lekki"]);
    }
}
