// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use public_api_checker::{
    config::{self, Config},
    health::make_health_checks,
    metrics::MetricsRegistry,
    server::{shutdown_signal, AppState, RequestHandler, ServerBuilder},
    status::BuildInfo,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?
        .add_directive("hyper=info".parse()?);
    tracing_subscriber::fmt().with_env_filter(filter).init();

    config.validate()?;

    let definitions = match &config.checks_file {
        Some(path) => {
            info!("Loading checks from: {}", path.display());
            config::load_checks(path).await?
        }
        None => config::default_checks(),
    };

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;

    let checks = make_health_checks(
        &config.base_url,
        &definitions,
        config.credentials(),
        client,
    )?;
    info!(
        base_url = %config.base_url,
        checks = checks.len(),
        basic_auth = config.credentials().is_some(),
        "Configured downstream checks"
    );

    let metrics = MetricsRegistry::new()?;
    let state = Arc::new(AppState::new(checks, metrics, BuildInfo::current()));

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("starting on port {}", config.port);

    ServerBuilder::new(addr)
        .with_handler(RequestHandler::new(state))
        .with_shutdown(shutdown_signal())
        .serve()
        .await
}
