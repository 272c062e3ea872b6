//! HTTP adapter for the webhook endpoint.
//!
//! - `POST /webhooks/tebex` - Receive a Tebex webhook

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, ValidationResponse};
pub use handlers::{
    handle_tebex_webhook, WebhookApiError, WebhookAppState, FORWARDED_FOR_HEADER,
    SIGNATURE_HEADER,
};
pub use routes::{webhook_router, webhook_routes};
