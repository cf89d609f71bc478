//! Records in progress.
//!
//! An [`AgentDraft`] holds what a user typed, as strings, exactly the way a
//! form delivers it. Nothing here is trusted until it has been normalized into
//! a [`NewAgent`] or [`AgentUpdate`].

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::types::{Agent, AgentStatus, AgentUpdate, NewAgent};

/// A user-entered candidate record destined for create or update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentDraft {
    pub agent_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Selected status; blank means "use the default"
    pub status: String,
    pub zone: String,
    /// Every checked specialization, in form order
    pub specializations: Vec<String>,
    pub experience_years: String,
    pub rating: String,
    pub total_inspections: String,
}

impl AgentDraft {
    /// Normalize into a create payload.
    ///
    /// Required strings are trimmed, a blank zone becomes absent, numeric
    /// fields are coerced (blank or unparsable becomes absent) and the status
    /// defaults to active.
    #[must_use]
    pub fn to_new_agent(&self) -> NewAgent {
        NewAgent {
            agent_id: self.agent_id.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            status: AgentStatus::parse(&self.status).unwrap_or_default(),
            zone: optional_text(&self.zone),
            specializations: self.collect_specializations(),
            experience_years: parse_count("experience_years", &self.experience_years),
            rating: parse_rating(&self.rating),
            total_inspections: parse_count("total_inspections", &self.total_inspections),
        }
    }

    /// Normalize into an update payload. `agent_id` is dropped; status is only
    /// sent when one was selected.
    #[must_use]
    pub fn to_update(&self) -> AgentUpdate {
        let specializations = self.collect_specializations();
        AgentUpdate {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            zone: optional_text(&self.zone),
            status: AgentStatus::parse(&self.status),
            specializations: (!specializations.is_empty()).then_some(specializations),
            experience_years: parse_count("experience_years", &self.experience_years),
            rating: parse_rating(&self.rating),
            total_inspections: parse_count("total_inspections", &self.total_inspections),
        }
    }

    fn collect_specializations(&self) -> Vec<String> {
        self.specializations
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Derive an agent code from a display name:
    /// `agent_<slug>_<last four digits of the epoch millis>`.
    #[must_use]
    pub fn suggest_agent_id(name: &str, now: DateTime<Utc>) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut in_space = false;
        for c in name.trim().to_lowercase().chars() {
            if c.is_whitespace() {
                if !in_space {
                    slug.push('_');
                    in_space = true;
                }
                continue;
            }
            in_space = false;
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                slug.push(c);
            }
        }
        let suffix = now.timestamp_millis().rem_euclid(10_000);
        format!("agent_{slug}_{suffix:04}")
    }

    /// Fill `agent_id` from the name when the user has not typed one.
    /// Returns whether the field was filled.
    pub fn fill_agent_id_from_name(&mut self, now: DateTime<Utc>) -> bool {
        if !self.agent_id.is_empty() || self.name.trim().is_empty() {
            return false;
        }
        self.agent_id = Self::suggest_agent_id(&self.name, now);
        true
    }
}

impl From<&Agent> for AgentDraft {
    /// Prefill an edit form from a snapshot of a stored record.
    fn from(agent: &Agent) -> Self {
        Self {
            agent_id: agent.agent_id.clone(),
            name: agent.name.clone(),
            phone: agent.phone.clone(),
            email: agent.email.clone(),
            status: agent.status.as_str().to_string(),
            zone: agent.zone.clone().unwrap_or_default(),
            specializations: agent.specializations.clone(),
            experience_years: agent.experience_years.map(|v| v.to_string()).unwrap_or_default(),
            rating: agent.rating.map(|v| v.to_string()).unwrap_or_default(),
            total_inspections: agent.total_inspections.map(|v| v.to_string()).unwrap_or_default(),
        }
    }
}

/// Reformat raw phone input as the user types: keep digits only and lead
/// with `+`.
#[must_use]
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        digits
    } else {
        format!("+{digits}")
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_count(field: &'static str, value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(count) => Some(count),
        Err(_) => {
            warn!(field, value = trimmed, "dropping unparsable count");
            None
        }
    }
}

fn parse_rating(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Some(rating),
        _ => {
            warn!(field = "rating", value = trimmed, "dropping unparsable rating");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn jane() -> AgentDraft {
        AgentDraft {
            agent_id: " agent_jane_1234 ".to_string(),
            name: "Jane Doe".to_string(),
            phone: "+2348012345678".to_string(),
            email: "jane@example.com".to_string(),
            zone: "  ".to_string(),
            specializations: vec!["residential".to_string(), " ".to_string()],
            experience_years: "4".to_string(),
            rating: "4.5".to_string(),
            total_inspections: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_agent_normalization() {
        let payload = jane().to_new_agent();

        assert_eq!(payload.agent_id, "agent_jane_1234");
        assert_eq!(payload.status, AgentStatus::Active);
        assert_eq!(payload.zone, None);
        assert_eq!(payload.specializations, vec!["residential"]);
        assert_eq!(payload.experience_years, Some(4));
        assert_eq!(payload.rating, Some(4.5));
        assert_eq!(payload.total_inspections, None);
    }

    #[test]
    fn test_unparsable_numbers_become_absent() {
        let draft = AgentDraft {
            experience_years: "four".to_string(),
            rating: "NaN".to_string(),
            total_inspections: "-3".to_string(),
            ..jane()
        };
        let payload = draft.to_new_agent();

        assert_eq!(payload.experience_years, None);
        assert_eq!(payload.rating, None);
        assert_eq!(payload.total_inspections, None);
    }

    #[test]
    fn test_update_normalization() {
        let draft = AgentDraft {
            status: "inactive".to_string(),
            zone: "Ikeja".to_string(),
            specializations: vec![],
            ..jane()
        };
        let update = draft.to_update();

        assert_eq!(update.status, Some(AgentStatus::Inactive));
        assert_eq!(update.zone.as_deref(), Some("Ikeja"));
        assert_eq!(update.specializations, None);
        assert_eq!(update.name, "Jane Doe");
    }

    #[test]
    fn test_prefill_from_agent() {
        let agent = Agent {
            id: "1".to_string(),
            agent_id: "a1".to_string(),
            name: "Jane".to_string(),
            phone: "+2348012345678".to_string(),
            email: "j@x.com".to_string(),
            status: AgentStatus::Inactive,
            zone: None,
            specializations: vec![],
            experience_years: Some(7),
            rating: None,
            total_inspections: Some(12),
            created_at: None,
            updated_at: None,
        };
        let draft = AgentDraft::from(&agent);

        assert_eq!(draft.status, "inactive");
        assert_eq!(draft.zone, "");
        assert_eq!(draft.experience_years, "7");
        assert_eq!(draft.rating, "");
        assert_eq!(draft.total_inspections, "12");
    }

    #[test]
    fn test_suggest_agent_id() {
        let now = Utc.timestamp_millis_opt(1_700_000_001_234).unwrap();
        assert_eq!(AgentDraft::suggest_agent_id("  Jane   O'Doe ", now), "agent_jane_odoe_1234");

        let early = Utc.timestamp_millis_opt(1_700_000_000_042).unwrap();
        assert_eq!(AgentDraft::suggest_agent_id("Bob", early), "agent_bob_0042");
    }

    #[test]
    fn test_fill_agent_id_only_when_blank() {
        let now = Utc.timestamp_millis_opt(1_700_000_005_678).unwrap();

        let mut blank = AgentDraft {
            name: "Ada Obi".to_string(),
            ..Default::default()
        };
        assert!(blank.fill_agent_id_from_name(now));
        assert_eq!(blank.agent_id, "agent_ada_obi_5678");

        let mut typed = AgentDraft {
            name: "Ada Obi".to_string(),
            agent_id: "custom".to_string(),
            ..Default::default()
        };
        assert!(!typed.fill_agent_id_from_name(now));
        assert_eq!(typed.agent_id, "custom");

        let mut nameless = AgentDraft::default();
        assert!(!nameless.fill_agent_id_from_name(now));
    }

    #[test]
    fn test_format_phone_input() {
        assert_eq!(format_phone_input("0801 234-5678"), "+08012345678");
        assert_eq!(format_phone_input("+234 801"), "+234801");
        assert_eq!(format_phone_input("abc"), "");
    }
}
