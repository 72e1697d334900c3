//! Required field rules
//!
//! A required field must be present and, once trimmed, reach a minimum
//! number of characters. A missing field fails the same way as a short one.

use super::{Rule, RuleCategory, RuleContext};
use crate::error::ValidationError;
use crate::model::{Field, VehicleDraft};

/// Rule requiring a field to be present with a minimum trimmed length
pub struct MinLengthRule {
    id: String,
    field: Field,
    min: usize,
}

impl MinLengthRule {
    pub fn new(id: impl Into<String>, field: Field, min: usize) -> Self {
        Self {
            id: id.into(),
            field,
            min,
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn min(&self) -> usize {
        self.min
    }
}

impl Rule for MinLengthRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Validates that a field is present and long enough after trimming"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Required
    }

    fn check(&self, draft: &VehicleDraft, _context: &RuleContext) -> Result<(), ValidationError> {
        match draft.get(self.field) {
            Some(value) if value.trim().chars().count() >= self.min => Ok(()),
            _ => Err(ValidationError::TooShort {
                field: self.field,
                min: self.min,
            }),
        }
    }
}
