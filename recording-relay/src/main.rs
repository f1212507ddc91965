//! Recording Relay - speaking-test recordings to Telegram.
//!
//! This binary runs a small web server that:
//! - Accepts a recording and student details on `POST /api/sendRecording`
//! - Posts a summary message to the configured Telegram chat
//! - Uploads the recording to the same chat
//!
//! Configuration is read from the environment once at startup.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recording_relay::web::{router, SEND_RECORDING_PATH};
use recording_relay::{AppState, Config, TelegramTransport};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("relay_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        telegram_bot_token_set = config.telegram_bot_token.is_some(),
        telegram_chat_id_set = config.telegram_chat_id.is_some(),
        telegram_api_url = %config.telegram_api_url,
        "config_loaded"
    );

    if config.telegram_credentials().is_none() {
        warn!("telegram_credentials_missing");
    }

    // One HTTP client shared by all requests
    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let transport = TelegramTransport::new(client, &config.telegram_api_url)
        .context("Invalid TELEGRAM_API_URL")?;

    let port = config.port;
    let app = router(AppState::new(config, Arc::new(transport)));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, path = SEND_RECORDING_PATH, "relay_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("relay_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
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
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("relay_server_shutting_down");
}
