//! Enum value validation rules
//!
//! Checks that an optional field, when filled in, holds one of an allowed
//! set of values. Comparison is case-insensitive and ignores surrounding
//! whitespace.

use super::{Rule, RuleCategory, RuleContext};
use crate::config::ColorEntry;
use crate::error::ValidationError;
use crate::model::{eq_ignore_case, Field, VehicleDraft};

/// Rule restricting the vehicle color to a palette
pub struct ColorRule {
    id: String,
    palette: Vec<ColorEntry>,
}

impl ColorRule {
    pub fn new(id: impl Into<String>, palette: Vec<ColorEntry>) -> Self {
        Self {
            id: id.into(),
            palette,
        }
    }

    /// Canonical palette entry matching `value`, if any
    pub fn resolve(&self, value: &str) -> Option<&ColorEntry> {
        let value = value.trim();
        self.palette
            .iter()
            .find(|entry| entry.spellings().any(|s| eq_ignore_case(s, value)))
    }

    fn allowed(&self) -> Vec<String> {
        self.palette.iter().map(|c| c.name.clone()).collect()
    }
}

impl Rule for ColorRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Validates that a filled-in color belongs to the allowed palette"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Enum
    }

    fn check(&self, draft: &VehicleDraft, _context: &RuleContext) -> Result<(), ValidationError> {
        let Some(color) = draft.get(Field::Color) else {
            return Ok(());
        };
        if color.trim().is_empty() || self.resolve(color).is_some() {
            return Ok(());
        }
        Err(ValidationError::ColorNotAllowed {
            allowed: self.allowed(),
        })
    }
}
