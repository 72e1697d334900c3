//! Value bounds validation rules
//!
//! The model year is kept as text but must parse as an integer year inside a
//! window anchored to the current year.

use super::{Rule, RuleCategory, RuleContext};
use crate::error::ValidationError;
use crate::model::{Field, VehicleDraft};

/// Accepted model years relative to the current year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    /// How many years back a model may be
    pub max_age: u32,
    /// How many years ahead a model may be
    pub future: u32,
}

impl YearWindow {
    pub fn new(max_age: u32, future: u32) -> Self {
        Self { max_age, future }
    }

    /// Inclusive bounds for the given current year
    pub fn range(&self, current_year: i32) -> (i64, i64) {
        let current = i64::from(current_year);
        (
            current - i64::from(self.max_age),
            current + i64::from(self.future),
        )
    }

    pub fn check(&self, year: i64, current_year: i32) -> Result<(), ValidationError> {
        let (oldest, newest) = self.range(current_year);
        if year < oldest {
            return Err(ValidationError::VehicleTooOld {
                max_age: self.max_age,
            });
        }
        if year > newest {
            return Err(ValidationError::ModelYearInFuture);
        }
        Ok(())
    }
}

/// Rule requiring a numeric model year inside the window
pub struct ModelYearRule {
    id: String,
    window: YearWindow,
}

impl ModelYearRule {
    pub fn new(id: impl Into<String>, window: YearWindow) -> Self {
        Self {
            id: id.into(),
            window,
        }
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }
}

impl Rule for ModelYearRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Validates that the model year is numeric and within the accepted age window"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Bounds
    }

    fn check(&self, draft: &VehicleDraft, context: &RuleContext) -> Result<(), ValidationError> {
        let year = draft
            .get(Field::ModelYear)
            .and_then(|raw| raw.trim().parse::<i32>().ok())
            .ok_or(ValidationError::ModelYearNotNumeric)?;

        self.window.check(i64::from(year), context.current_year)
    }
}
