//! Agent data models.
//!
//! `Agent` is what the remote resource returns. `NewAgent` and `AgentUpdate`
//! are the normalized payloads sent to it; they are only ever produced from an
//! [`AgentDraft`](crate::draft::AgentDraft).

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Availability of a field agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Active,
    Inactive,
}

impl AgentStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Parse a form value. Matching is case-insensitive and ignores
    /// surrounding whitespace; anything unrecognised yields `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field agent as confirmed by the remote resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Opaque identifier assigned remotely; used only as a lookup key
    pub id: String,
    /// Human-facing agent code
    pub agent_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default)]
    pub zone: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_inspections: Option<u32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Server-assigned timestamps come as RFC 3339 or as a naive ISO string that
/// is implicitly UTC. Anything else decodes as absent rather than failing the
/// whole record.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(Value::String(text)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(stamp) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(stamp.with_timezone(&Utc)));
    }
    Ok(["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .map(|naive| naive.and_utc()))
}

/// Body of a create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAgent {
    pub agent_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub status: AgentStatus,
    pub zone: Option<String>,
    pub specializations: Vec<String>,
    pub experience_years: Option<u32>,
    pub rating: Option<f64>,
    pub total_inspections: Option<u32>,
}

/// Body of an update-by-id request.
///
/// `agent_id` is immutable after creation and never sent. Specializations are
/// only sent when the draft carried some, so an edit form without that field
/// leaves the stored list alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentUpdate {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,
    pub experience_years: Option<u32>,
    pub rating: Option<f64>,
    pub total_inspections: Option<u32>,
}
