//! Axum router configuration for the webhook endpoint.

use axum::{routing::post, Router};

use super::handlers::{handle_tebex_webhook, WebhookAppState};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; they are verified by source IP and
/// signature in the application layer.
///
/// # Routes
/// - `POST /tebex` - Handle Tebex webhooks
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new().route("/tebex", post(handle_tebex_webhook))
}

/// Create the complete webhook router mounted at `/webhooks`.
///
/// # Example
///
/// ```ignore
/// let app = webhook_router().with_state(WebhookAppState::new(handler, false));
/// ```
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().nest("/webhooks", webhook_routes())
}
