//! Structural validation engine
//!
//! The [`Validator`] holds an ordered list of rules. Write paths use
//! [`Validator::first_violation`]: rules run in registration order and the
//! first failure wins. [`Validator::violations`] runs every rule and is meant
//! for diagnostics.

pub mod rules;

use std::sync::Arc;

use crate::config::RulesConfig;
use crate::model::{Field, VehicleDraft};
use rules::bounds::{ModelYearRule, YearWindow};
use rules::denylist::DenylistRule;
use rules::enum_check::ColorRule;
use rules::required::MinLengthRule;
use rules::{Rule, RuleCategory, RuleContext, RuleViolation};

/// Rule identifiers of the default rule set, in evaluation order
pub mod rule_ids {
    pub const PLATE_LENGTH: &str = "plate-length";
    pub const BRAND_LENGTH: &str = "brand-length";
    pub const MODEL_YEAR_LENGTH: &str = "model-year-length";
    pub const OWNER_LENGTH: &str = "owner-length";
    pub const COLOR_ALLOWED: &str = "color-allowed";
    pub const MODEL_YEAR_RANGE: &str = "model-year-range";
    pub const INPUT_DENYLIST: &str = "input-denylist";
}

/// Ordered set of structural validation rules
#[derive(Clone)]
pub struct Validator {
    rules: Vec<Arc<dyn Rule>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}

impl Validator {
    /// Create a validator with the default rules, parameterised by `config`
    pub fn from_config(config: &RulesConfig) -> Self {
        let mut validator = Self::empty();
        validator.register_default_rules(config);
        validator
    }

    /// Create a validator with no rules
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    fn register_default_rules(&mut self, config: &RulesConfig) {
        // Presence and length, in field order
        self.register(Arc::new(MinLengthRule::new(
            rule_ids::PLATE_LENGTH,
            Field::Plate,
            config.min_plate_len,
        )));
        self.register(Arc::new(MinLengthRule::new(
            rule_ids::BRAND_LENGTH,
            Field::Brand,
            config.min_brand_len,
        )));
        self.register(Arc::new(MinLengthRule::new(
            rule_ids::MODEL_YEAR_LENGTH,
            Field::ModelYear,
            config.min_model_year_len,
        )));
        self.register(Arc::new(MinLengthRule::new(
            rule_ids::OWNER_LENGTH,
            Field::Owner,
            config.min_owner_len,
        )));

        self.register(Arc::new(ColorRule::new(
            rule_ids::COLOR_ALLOWED,
            config.colors.clone(),
        )));

        self.register(Arc::new(ModelYearRule::new(
            rule_ids::MODEL_YEAR_RANGE,
            YearWindow::new(config.max_vehicle_age_years, config.future_model_years),
        )));

        self.register(Arc::new(DenylistRule::new(
            rule_ids::INPUT_DENYLIST,
            config.denylist.iter().cloned(),
        )));
    }

    /// Append a rule; it runs after every rule registered before it
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn rules_by_category(&self, category: RuleCategory) -> Vec<Arc<dyn Rule>> {
        self.rules
            .iter()
            .filter(|r| r.category() == category)
            .cloned()
            .collect()
    }

    /// Run rules in order and stop at the first failure
    pub fn first_violation(
        &self,
        draft: &VehicleDraft,
        context: &RuleContext,
    ) -> Result<(), RuleViolation> {
        for rule in &self.rules {
            if let Err(error) = rule.check(draft, context) {
                return Err(RuleViolation::new(rule.as_ref(), error));
            }
        }
        Ok(())
    }

    /// Run every rule and collect all failures in rule order
    pub fn violations(&self, draft: &VehicleDraft, context: &RuleContext) -> Vec<RuleViolation> {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.check(draft, context)
                    .err()
                    .map(|error| RuleViolation::new(rule.as_ref(), error))
            })
            .collect()
    }
}
