use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use dotenvy::dotenv;
use medeez::router::init_router;
use medeez::state::init_app_state;
use medeez_config::{LoggingConfig, ServerConfig};
use medeez_observability::{init_logging, init_metrics};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let logging_config = LoggingConfig::from_env();
    let _log_guard = init_logging(&logging_config)?;
    let metrics_handle = init_metrics(&logging_config)?;

    let state = init_app_state().with_metrics(metrics_handle);
    if state.jwt_config.secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set");
    }
    if let Some(limiter) = &state.rate_limiter {
        limiter.spawn_cleanup(Duration::from_secs(60));
    }
    let app = init_router(state);

    let server_config = ServerConfig::from_env();
    let listener = tokio::net::TcpListener::bind(&server_config.addr)
        .await
        .with_context(|| format!("failed to bind {}", server_config.addr))?;

    info!(addr = %server_config.addr, "Server running");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
