//! Tebex webhook receiver server.
//!
//! Loads configuration from `TEBEX_WEBHOOKS__*` environment variables and
//! serves `POST /webhooks/tebex`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tebex_webhooks::adapters::http::{webhook_router, WebhookAppState};
use tebex_webhooks::adapters::LoggingWebhookHandler;
use tebex_webhooks::application::ReceiveWebhookHandler;
use tebex_webhooks::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let authenticator = Arc::new(config.webhook.authenticator()?);
    let handler = Arc::new(ReceiveWebhookHandler::new(
        authenticator,
        config.webhook.canonical_form,
        Arc::new(LoggingWebhookHandler::new()),
    ));

    let state = WebhookAppState::new(handler, config.webhook.forwarded_for_proxies()?);
    let app = webhook_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        canonical_form = ?config.webhook.canonical_form,
        verify_origin = config.webhook.verify_origin,
        "Tebex webhook receiver listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(server: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;

    if server.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
