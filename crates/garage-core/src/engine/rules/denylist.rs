//! Input screening rule
//!
//! Rejects drafts whose combined field text contains SQL-looking fragments.
//! This is a safety net only: the record store binds every value as a
//! parameter regardless of what passes here.

use super::{Rule, RuleCategory, RuleContext};
use crate::error::ValidationError;
use crate::model::{Field, VehicleDraft};

/// Rule rejecting drafts that contain a denylisted substring
pub struct DenylistRule {
    id: String,
    patterns: Vec<String>,
}

impl DenylistRule {
    pub fn new<I, S>(id: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            patterns: patterns
                .into_iter()
                .map(|p| p.into().to_lowercase())
                .collect(),
        }
    }

    /// Lower-cased text the patterns are matched against.
    ///
    /// Each trimmed value is padded with a space on both sides so word
    /// patterns such as `" drop "` also match at the start or end of a field.
    pub fn haystack(draft: &VehicleDraft) -> String {
        Field::ALL
            .iter()
            .map(|&field| match draft.get(field) {
                Some(value) => format!(" {} ", value.trim()),
                None => String::new(),
            })
            .collect::<Vec<_>>()
            .join("|")
            .to_lowercase()
    }

    /// First pattern found in the draft
    pub fn first_match(&self, draft: &VehicleDraft) -> Option<&str> {
        let haystack = Self::haystack(draft);
        self.patterns
            .iter()
            .find(|pattern| haystack.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

impl Rule for DenylistRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Rejects input containing injection-like fragments"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Sanitization
    }

    fn check(&self, draft: &VehicleDraft, _context: &RuleContext) -> Result<(), ValidationError> {
        match self.first_match(draft) {
            Some(pattern) => {
                tracing::debug!(pattern = %pattern, "denylisted input");
                Err(ValidationError::InputNotAllowed)
            }
            None => Ok(()),
        }
    }
}
