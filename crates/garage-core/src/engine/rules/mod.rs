//! Rule framework for structural validation
//!
//! A rule inspects a [`VehicleDraft`] and either accepts it or returns the
//! [`ValidationError`] describing the first problem it found. Rules never
//! touch storage.

pub mod bounds;
pub mod denylist;
pub mod enum_check;
pub mod required;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::model::VehicleDraft;

/// Categories of validation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Field presence and minimum length
    Required,
    /// Value must come from an allowed set
    Enum,
    /// Numeric parsing and range
    Bounds,
    /// Screening for injection-like input
    Sanitization,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Required => write!(f, "required"),
            RuleCategory::Enum => write!(f, "enum"),
            RuleCategory::Bounds => write!(f, "bounds"),
            RuleCategory::Sanitization => write!(f, "sanitization"),
        }
    }
}

/// Context provided to rules during evaluation
#[derive(Debug, Clone, Copy)]
pub struct RuleContext {
    /// Year the model-year window is anchored to
    pub current_year: i32,
}

impl RuleContext {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }
}

/// Trait for implementing validation rules
///
/// Rules are deterministic: the same draft and context always produce the
/// same outcome.
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &str;

    /// Description of what this rule validates
    fn description(&self) -> &str;

    fn category(&self) -> RuleCategory;

    fn check(&self, draft: &VehicleDraft, context: &RuleContext) -> Result<(), ValidationError>;
}

/// A failed rule together with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub rule_id: String,
    pub category: RuleCategory,
    pub error: ValidationError,
}

impl RuleViolation {
    pub fn new(rule: &dyn Rule, error: ValidationError) -> Self {
        Self {
            rule_id: rule.id().to_string(),
            category: rule.category(),
            error,
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.category, self.rule_id, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    #[test]
    fn test_violation_display() {
        let violation = RuleViolation {
            rule_id: "plate-length".to_string(),
            category: RuleCategory::Required,
            error: ValidationError::TooShort {
                field: Field::Plate,
                min: 3,
            },
        };
        assert_eq!(
            violation.to_string(),
            "[required] plate-length: plate must be at least 3 characters"
        );
    }
}
