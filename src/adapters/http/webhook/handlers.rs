//! HTTP handler for the Tebex webhook endpoint.
//!
//! Connects the Axum route to the `ReceiveWebhookHandler` command handler.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::webhook::{
    ReceiveWebhookCommand, ReceiveWebhookHandler, ReceiveWebhookResult,
};
use crate::domain::webhook::{TransportMeta, WebhookError};

use super::dto::{ErrorResponse, ValidationResponse};

/// Header carrying the hex HMAC signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Header set by reverse proxies with the original client address.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the webhook route.
#[derive(Clone)]
pub struct WebhookAppState {
    pub handler: Arc<ReceiveWebhookHandler>,
    /// Peers whose `X-Forwarded-For` header is honoured. Empty ignores the header.
    pub trusted_proxies: Arc<[IpAddr]>,
}

impl WebhookAppState {
    pub fn new(handler: Arc<ReceiveWebhookHandler>, trusted_proxies: Vec<IpAddr>) -> Self {
        Self {
            handler,
            trusted_proxies: trusted_proxies
                .into_iter()
                .map(|ip| ip.to_canonical())
                .collect(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/tebex - Receive a Tebex webhook
///
/// Validation webhooks are answered with `200 {"id": ...}`, every other
/// accepted webhook with `204 No Content`.
pub async fn handle_tebex_webhook(
    State(state): State<WebhookAppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let source_ip = source_ip(
        &headers,
        peer.map(|ConnectInfo(addr)| addr),
        &state.trusted_proxies,
    );

    let cmd = ReceiveWebhookCommand {
        payload: body.to_vec(),
        transport: TransportMeta::new(signature, source_ip),
    };

    let response = match state.handler.handle(cmd).await? {
        ReceiveWebhookResult::ValidationAcknowledged { id } => {
            (StatusCode::OK, Json(ValidationResponse { id })).into_response()
        }
        ReceiveWebhookResult::Processed { .. } => StatusCode::NO_CONTENT.into_response(),
    };

    Ok(response)
}

/// Determine the source IP for the origin check.
///
/// The forwarded header is only read when the connecting peer is a trusted
/// proxy. Entries are walked from the right, skipping trusted proxies, so a
/// client-supplied prefix is never taken as the source.
fn source_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxies: &[IpAddr],
) -> Option<String> {
    let peer_ip = peer.map(|addr| addr.ip().to_canonical());

    if peer_ip.is_some_and(|ip| trusted_proxies.contains(&ip)) {
        if let Some(client) = forwarded_client(headers, trusted_proxies) {
            return Some(client.to_string());
        }
    }

    peer_ip.map(|ip| ip.to_string())
}

/// Rightmost `X-Forwarded-For` entry that is not a trusted proxy.
///
/// `None` if the header is absent, holds only proxies, or an entry that must
/// be inspected does not parse.
fn forwarded_client(headers: &HeaderMap, trusted_proxies: &[IpAddr]) -> Option<IpAddr> {
    let entries: Vec<&str> = headers
        .get_all(FORWARDED_FOR_HEADER)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .collect();

    for entry in entries.into_iter().rev() {
        let ip = entry.parse::<IpAddr>().ok()?.to_canonical();
        if !trusted_proxies.contains(&ip) {
            return Some(ip);
        }
    }

    None
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.code(), "Webhook request failed");
        } else {
            tracing::warn!(error = %self.0, code = self.0.code(), "Webhook request rejected");
        }

        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}
