//! Property-based tests for the agent directory.
//!
//! These tests validate filter and validator properties across generated
//! collections and inputs.

use proptest::prelude::*;

use agent_directory::{
    format_phone_input, is_valid_phone, Agent, AgentFilter, AgentStatus, DirectoryCache,
    DirectoryView,
};

const ZONES: [&str; 3] = ["Lekki", "Ikeja", "Yaba"];

fn status_from_flag(active: bool) -> AgentStatus {
    if active {
        AgentStatus::Active
    } else {
        AgentStatus::Inactive
    }
}

fn agent_strategy() -> impl Strategy<Value = Agent> {
    (
        "[a-z]{1,8}",
        "[A-Za-z]{1,6}( [A-Za-z]{1,6})?",
        "\\+[1-9][0-9]{6,12}",
        prop::option::of(0..ZONES.len()),
        any::<bool>(),
    )
        .prop_map(|(code, name, phone, zone, active)| Agent {
            id: String::new(),
            agent_id: format!("agent_{code}"),
            email: format!("{}@example.com", code),
            name,
            phone,
            status: status_from_flag(active),
            zone: zone.map(|i| ZONES[i].to_string()),
            specializations: vec![],
            experience_years: None,
            rating: None,
            total_inspections: None,
            created_at: None,
            updated_at: None,
        })
}

/// Collections with distinct, position-derived ids.
fn collection_strategy() -> impl Strategy<Value = Vec<Agent>> {
    prop::collection::vec(agent_strategy(), 0..20).prop_map(|agents| {
        agents
            .into_iter()
            .enumerate()
            .map(|(i, agent)| Agent {
                id: i.to_string(),
                ..agent
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = AgentFilter> {
    (
        "[A-Za-z]{0,3}",
        prop::option::of(0..ZONES.len()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(search, zone, active)| {
            AgentFilter::all()
                .with_search(&search)
                .with_zone(zone.map(|i| ZONES[i]))
                .with_status(active.map(status_from_flag))
        })
}

fn visible_ids(view: &DirectoryView) -> Vec<String> {
    view.agents().iter().map(|a| a.id.clone()).collect()
}

proptest! {
    /// The view after load + filter is exactly the matching subset, in
    /// collection order.
    #[test]
    fn test_view_is_ordered_matching_subset(
        agents in collection_strategy(),
        filter in filter_strategy(),
    ) {
        let mut cache = DirectoryCache::new();
        cache.load(agents.clone());
        cache.set_filter(filter.clone());

        let expected: Vec<String> = agents
            .iter()
            .filter(|a| filter.matches(a))
            .map(|a| a.id.clone())
            .collect();

        let view = cache.current_view();
        if expected.is_empty() {
            prop_assert!(view.is_no_results());
        } else {
            prop_assert_eq!(visible_ids(&view), expected);
        }
    }

    /// Applying the same filter twice yields the same view as once.
    #[test]
    fn test_set_filter_is_idempotent(
        agents in collection_strategy(),
        filter in filter_strategy(),
    ) {
        let mut once = DirectoryCache::new();
        once.load(agents.clone());
        once.set_filter(filter.clone());

        let mut twice = DirectoryCache::new();
        twice.load(agents);
        twice.set_filter(filter.clone());
        twice.set_filter(filter);

        prop_assert_eq!(once.current_view(), twice.current_view());
    }

    /// Filter order does not matter: loading after filtering equals
    /// filtering after loading.
    #[test]
    fn test_filter_then_load_matches_load_then_filter(
        agents in collection_strategy(),
        filter in filter_strategy(),
    ) {
        let mut before = DirectoryCache::new();
        before.set_filter(filter.clone());
        before.load(agents.clone());

        let mut after = DirectoryCache::new();
        after.load(agents);
        after.set_filter(filter);

        prop_assert_eq!(before.current_view(), after.current_view());
    }

    /// Search is case-insensitive.
    #[test]
    fn test_search_ignores_case(agents in collection_strategy(), term in "[A-Za-z]{1,3}") {
        let mut lower = DirectoryCache::new();
        lower.load(agents.clone());
        lower.set_filter(AgentFilter::all().with_search(&term.to_lowercase()));

        let mut upper = DirectoryCache::new();
        upper.load(agents);
        upper.set_filter(AgentFilter::all().with_search(&term.to_uppercase()));

        prop_assert_eq!(lower.current_view(), upper.current_view());
    }

    /// Well-formed international numbers pass.
    #[test]
    fn test_international_phone_accepted(number in "\\+[1-9][0-9]{1,14}") {
        prop_assert!(is_valid_phone(&number));
    }

    /// Numbers without a leading plus, or with a leading zero, fail.
    #[test]
    fn test_local_phone_rejected(digits in "[0-9]{2,15}") {
        prop_assert!(!is_valid_phone(&digits));
        let with_zero = format!("+0{digits}");
        prop_assert!(!is_valid_phone(&with_zero));
    }

    /// Formatted phone input keeps only digits behind a single plus.
    #[test]
    fn test_format_phone_input_keeps_digits(raw in "[0-9 ()+\\-]{0,20}") {
        let formatted = format_phone_input(&raw);
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            prop_assert!(formatted.is_empty());
        } else {
            prop_assert_eq!(formatted, format!("+{digits}"));
        }
    }
}
