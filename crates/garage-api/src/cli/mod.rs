//! Command line for the garage catalog server
//!
//! `serve` starts the HTTP dispatcher; `check` runs the structural rules over
//! a vehicle described in a JSON or YAML file without touching any store.

pub mod commands;
pub mod output;

pub use commands::{execute_check, GarageCli, GarageCommands, ServeArgs};
pub use output::{CheckReport, OutputFormat};

use std::path::PathBuf;
use thiserror::Error;

use crate::config::AppConfigError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// The vehicle breaks at least one rule
    ValidationError = 1,
    /// Unreadable input file or configuration
    InvalidInput = 3,
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Errors raised by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse vehicle file: {0}")]
    Parse(String),

    #[error(transparent)]
    Config(#[from] AppConfigError),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Whether the failure was caused by the user's input
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CliError::Render(_))
    }
}

/// Run a `check` and map failures to an exit code
pub fn run_check(
    file: &std::path::Path,
    format: OutputFormat,
    config: Option<&std::path::Path>,
) -> ExitCode {
    match execute_check(file, format, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                ExitCode::InvalidInput
            } else {
                ExitCode::InternalError
            }
        }
    }
}
