//! Garage API
//!
//! Request dispatcher for the garage vehicle catalog: an axum router that
//! decodes the catalog form, runs the business rule engine and renders the
//! vehicle list, plus the `garage-server` command line.

pub mod cli;
pub mod config;
pub mod handler;
pub mod server;

pub use cli::{run_check, ExitCode, GarageCli, GarageCommands};
pub use config::{AppConfig, AppConfigError};
pub use handler::{create_router, HandlerState, ListView};
pub use server::{build_state, serve};
