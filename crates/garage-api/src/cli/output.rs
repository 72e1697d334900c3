//! Output formatting for `garage-server check`

use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use garage_core::RuleViolation;

use super::CliError;

/// Output format options for CLI results
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Text,
    /// JSON for machine processing
    Json,
}

/// Result of checking one vehicle file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub valid: bool,
    pub rules_applied: usize,
    pub violations: Vec<ViolationOutput>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationOutput {
    pub rule: String,
    pub category: String,
    pub message: String,
}

impl CheckReport {
    pub fn from_violations(violations: &[RuleViolation], rules_applied: usize) -> Self {
        let valid = violations.is_empty();
        let summary = if valid {
            "Vehicle is valid".to_string()
        } else {
            format!("Vehicle breaks {} rule(s)", violations.len())
        };

        Self {
            valid,
            rules_applied,
            violations: violations
                .iter()
                .map(|v| ViolationOutput {
                    rule: v.rule_id.clone(),
                    category: v.category.to_string(),
                    message: v.error.to_string(),
                })
                .collect(),
            summary,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, CliError> {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| CliError::Render(e.to_string()))
            }
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let status = if self.valid { "+".green() } else { "x".red() };
        let _ = writeln!(out, "{} {}", status, self.summary);
        let _ = writeln!(out, "  Rules applied: {}", self.rules_applied);

        for (index, violation) in self.violations.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. [{}] {}: {}",
                index + 1,
                violation.category,
                violation.rule.as_str().yellow(),
                violation.message
            );
        }
        out
    }
}
