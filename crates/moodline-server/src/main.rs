//! Moodline sentiment classification API
//!
//! Resolves a sentiment model through a tiered cascade at startup (central
//! registry, local snapshot, pretrained fallback) and serves classifications
//! over HTTP. If no tier yields a model the process aborts: the service
//! must not accept traffic it cannot answer.

use anyhow::Result;
use clap::Parser;
use moodline_classifiers::{InferenceDispatcher, Resolution};
use moodline_server::config::{Cli, ServerConfig};
use moodline_server::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Moodline server");

    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Registry: {}", config.resolver.registry.tracking_url);
    info!("Local model: {}", config.resolver.local_model_path.display());
    info!("Fallback model: {}", config.resolver.fallback_model_id);

    // Single-shot resolution before accepting any traffic. Total failure
    // here is fatal by contract.
    let resolution = Resolution::establish(&config.resolver).await?;
    info!("Model resolution complete ({} tier active)", resolution.mode());

    let state = AppState::new(InferenceDispatcher::new(Arc::new(resolution)));
    let app = routes::create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("moodline_server=debug,moodline_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("moodline_server=info,moodline_classifiers=info")
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
