use anyhow::Context;
use claim_checker::api::{build_router, AppState};
use claim_checker::logging::init_tracing;
use claim_checker::{Config, Orchestrator};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let path = std::env::var("CHECKER_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::from_file(&path).context("failed to load configuration")?;

    init_tracing(&config.logging);

    let orchestrator = Orchestrator::from_config(&config).context("failed to build orchestrator")?;
    info!(
        "Claim checker starting with {} evidence providers",
        orchestrator.registry().len()
    );

    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        min_claim_chars: config.engine.min_claim_chars,
    };
    let app = build_router(state, config.server.max_body_bytes);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
