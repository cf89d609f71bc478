//! Field validation for drafts.
//!
//! Pure checks with no side effects. Whether a failing draft may still be
//! submitted is decided by [`ValidationMode`], not here.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::draft::AgentDraft;

/// E.164-like: a plus sign, a non-zero digit, then 1 to 14 more digits.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("phone regex is valid"));

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

pub const PHONE_FORMAT_MESSAGE: &str =
    "Phone number must be in international format (e.g., +2348012345678)";
pub const EMAIL_FORMAT_MESSAGE: &str = "Please enter a valid email address";

/// Whether failed validation blocks submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Report problems but submit anyway
    #[default]
    Advisory,
    /// Refuse to submit a draft with problems
    Enforce,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advisory" => Ok(Self::Advisory),
            "enforce" => Ok(Self::Enforce),
            other => Err(format!("unknown validation mode: {other}")),
        }
    }
}

/// A draft field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    AgentId,
    Name,
    Phone,
    Email,
    ExperienceYears,
    Rating,
    TotalInspections,
}

impl DraftField {
    /// Form field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AgentId => "agent_id",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::ExperienceYears => "experience_years",
            Self::Rating => "rating",
            Self::TotalInspections => "total_inspections",
        }
    }

    /// Wording used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AgentId => "agent id",
            Self::Name => "name",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::ExperienceYears => "experience years",
            Self::Rating => "rating",
            Self::TotalInspections => "total inspections",
        }
    }
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: DraftField,
    pub message: String,
}

/// Ordered outcome of validating a draft. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: DraftField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages in the order the checks ran.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Fields to mark as erroneous.
    #[must_use]
    pub fn fields(&self) -> BTreeSet<DraftField> {
        self.errors.iter().map(|e| e.field).collect()
    }

    #[must_use]
    pub fn has_field(&self, field: DraftField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Check a draft.
///
/// Required fields first (agent id, name, phone, email; blank after
/// trimming fails), then phone and email format when present, then numeric
/// ranges when present.
///
/// Phone and email formats are checked on the trimmed value, the same value
/// the payload carries, so surrounding whitespace alone is not an error.
#[must_use]
pub fn validate(draft: &AgentDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let required = [
        (DraftField::AgentId, &draft.agent_id),
        (DraftField::Name, &draft.name),
        (DraftField::Phone, &draft.phone),
        (DraftField::Email, &draft.email),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(field, format!("{} is required", field.label()));
        }
    }

    let phone = draft.phone.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        errors.push(DraftField::Phone, PHONE_FORMAT_MESSAGE);
    }

    let email = draft.email.trim();
    if !email.is_empty() && !is_valid_email(email) {
        errors.push(DraftField::Email, EMAIL_FORMAT_MESSAGE);
    }

    check_count(&mut errors, DraftField::ExperienceYears, &draft.experience_years);
    check_count(&mut errors, DraftField::TotalInspections, &draft.total_inspections);

    let rating = draft.rating.trim();
    if !rating.is_empty() {
        let in_range = rating
            .parse::<f64>()
            .is_ok_and(|r| (0.0..=5.0).contains(&r));
        if !in_range {
            errors.push(DraftField::Rating, "rating must be between 0 and 5");
        }
    }

    errors
}

fn check_count(errors: &mut ValidationErrors, field: DraftField, value: &str) {
    let value = value.trim();
    if !value.is_empty() && value.parse::<u32>().is_err() {
        errors.push(
            field,
            format!("{} must be a whole number of zero or more", field.label()),
        );
    }
}
