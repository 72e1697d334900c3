//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use garage_core::{Clock, RuleContext, SystemClock, Validator, VehicleDraft};

use super::output::{CheckReport, OutputFormat};
use super::{CliError, ExitCode};
use crate::config::AppConfig;

/// Garage vehicle catalog server
#[derive(Parser, Debug)]
#[command(name = "garage-server")]
#[command(about = "Garage vehicle catalog - CRUD server with business rule checks", long_about = None)]
#[command(version)]
pub struct GarageCli {
    #[command(subcommand)]
    pub command: GarageCommands,
}

#[derive(Subcommand, Debug)]
pub enum GarageCommands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Check a vehicle file (JSON/YAML) against the structural rules
    ///
    /// Reports every rule the vehicle breaks. Exits with 1 when there is at
    /// least one violation.
    Check {
        /// Path to the vehicle file
        #[arg(short, long)]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Rules configuration (TOML)
        #[arg(short, long, env = "GARAGE_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "PORT")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Server configuration (TOML)
    #[arg(short, long, env = "GARAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database file; overrides the configured store
    #[arg(long, env = "GARAGE_DATABASE")]
    pub database: Option<PathBuf>,
}

/// Execute the check command
pub fn execute_check(
    file: &Path,
    format: OutputFormat,
    config: Option<&Path>,
) -> Result<ExitCode, CliError> {
    let config = AppConfig::load(config)?;
    let draft = load_draft(file)?;

    let report = check_draft(&draft, &Validator::from_config(&config.rules), &SystemClock);
    println!("{}", report.render(format)?);

    Ok(if report.valid {
        ExitCode::Success
    } else {
        ExitCode::ValidationError
    })
}

/// Run every rule over `draft`
pub fn check_draft(draft: &VehicleDraft, validator: &Validator, clock: &dyn Clock) -> CheckReport {
    let violations = validator.violations(draft, &RuleContext::new(clock.current_year()));
    tracing::debug!(violations = violations.len(), "vehicle checked");
    CheckReport::from_violations(&violations, validator.rules().len())
}

/// Read a vehicle from a JSON or YAML file, chosen by extension
pub fn load_draft(path: &Path) -> Result<VehicleDraft, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&content).map_err(|e| CliError::Parse(e.to_string()))
    } else {
        serde_json::from_str(&content).map_err(|e| CliError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use garage_core::FixedClock;
    use std::io::Write;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_definition() {
        GarageCli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_args() {
        let cli = GarageCli::try_parse_from([
            "garage-server",
            "check",
            "--file",
            "car.yaml",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            GarageCommands::Check { file, format, .. } => {
                assert_eq!(file, PathBuf::from("car.yaml"));
                assert_eq!(format, OutputFormat::Json);
            }
            GarageCommands::Serve(_) => panic!("expected check"),
        }
    }

    #[test]
    fn test_load_json_and_yaml() {
        let json = write_file(
            ".json",
            r#"{"plate": "ABC123", "brand": "Toyota", "model_year": "2019", "owner": "Maria Lopez"}"#,
        );
        let draft = load_draft(json.path()).unwrap();
        assert_eq!(draft.plate.as_deref(), Some("ABC123"));
        assert!(draft.color.is_none());

        let yaml = write_file(".yaml", "plate: XYZ999\ncolor: Azul\n");
        let draft = load_draft(yaml.path()).unwrap();
        assert_eq!(draft.plate.as_deref(), Some("XYZ999"));
        assert_eq!(draft.color.as_deref(), Some("Azul"));
        assert!(draft.owner.is_none());
    }

    #[test]
    fn test_load_malformed_file() {
        let file = write_file(".json", "{ not json");
        assert!(matches!(load_draft(file.path()), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_check_draft_reports_all_violations() {
        let draft = VehicleDraft::new()
            .plate("AB")
            .brand("Toyota")
            .model_year("2019")
            .color("Verde")
            .owner("Maria Lopez");
        let report = check_draft(&draft, &Validator::default(), &FixedClock(2026));

        assert!(!report.valid);
        let rules: Vec<_> = report.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["plate-length", "color-allowed"]);
        assert_eq!(report.rules_applied, 7);
    }

    #[test]
    fn test_check_valid_file() {
        let file = write_file(
            ".json",
            r#"{"plate": "ABC123", "brand": "Toyota", "model_year": "2019", "color": "rojo", "owner": "Maria Lopez"}"#,
        );
        let code = execute_check(file.path(), OutputFormat::Json, None).unwrap();
        assert_eq!(code, ExitCode::Success);
    }
}
