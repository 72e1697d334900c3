//! garage-server
//!
//! ```bash
//! # Serve the catalog on port 8080 backed by ./garage.db
//! garage-server serve --port 8080 --database garage.db
//!
//! # Check a vehicle file against the rules
//! garage-server check --file vehicle.yaml --format json
//! ```
//!
//! `check` exits with 0 when the vehicle is valid, 1 when it breaks a rule
//! and 3 when the file or configuration cannot be read.

use clap::Parser;
use garage_api::{run_check, serve, ExitCode, GarageCli, GarageCommands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = GarageCli::parse();

    match cli.command {
        GarageCommands::Serve(args) => serve(&args).await?,
        GarageCommands::Check {
            file,
            format,
            config,
        } => {
            let code = run_check(&file, format, config.as_deref());
            if code != ExitCode::Success {
                std::process::exit(code.into());
            }
        }
    }

    Ok(())
}
