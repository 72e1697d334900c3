//! HTTP server startup

use std::net::SocketAddr;

use garage_core::VehicleService;

use crate::cli::ServeArgs;
use crate::config::AppConfig;
use crate::handler::{create_router, HandlerState};

/// Build the service from `config` and wrap it in handler state
pub fn build_state(config: AppConfig) -> anyhow::Result<HandlerState> {
    let store = garage_storage::open_store(&config.store)?;
    let service = VehicleService::new(store, config.rules);
    Ok(HandlerState::new(service))
}

/// Load configuration, open the store and serve until Ctrl-C
pub async fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(database) = &args.database {
        config = config.with_database(database);
    }

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let router = create_router(build_state(config)?);

    tracing::info!("Starting garage catalog on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
