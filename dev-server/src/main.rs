//! Development server for Agent Console UI development
//!
//! Serves the canned backend fixtures on a fixed port so the UI can be run
//! with `trunk serve` without a real backend.
//!
//! Usage: cargo run -p dev-server

use anyhow::{Context, Result};
use payloads::{APIClient, ClientConfig, MemoryTokenStore};
use std::net::TcpListener;
use std::sync::Arc;
use tracing::info;
use wiremock::MockServer;

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = test_helpers::telemetry::get_subscriber("info".into());
    test_helpers::telemetry::init_subscriber(subscriber)?;

    let port = match std::env::var("DEV_SERVER_PORT") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("DEV_SERVER_PORT is not a port: {value}"))?,
        Err(_) => DEFAULT_PORT,
    };

    info!("🚀 Starting Agent Console development server");

    let listener = TcpListener::bind(("127.0.0.1", port))
        .with_context(|| format!("Failed to bind port {port}"))?;
    let server = MockServer::builder().listener(listener).start().await;
    test_helpers::fixtures::mount_all(&server).await;

    // Talk to ourselves once so a broken fixture shows up at startup.
    let client = APIClient::new(
        ClientConfig::from_env().with_base_url(server.uri()),
        Arc::new(MemoryTokenStore::new()),
    );
    if client.health_check().await {
        info!("✅ Mock backend healthy at {}", server.uri());
    } else {
        tracing::warn!("Mock backend at {} failed its health check", server.uri());
    }

    info!("🎯 Development server ready!");
    info!("   API: {}/api/v1/", server.uri());
    info!("   UI:  cd ui && API_BASE_URL={} trunk serve", server.uri());
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
