//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum webhook receiver
//! - `webhook` - `WebhookEventHandler` implementations

pub mod http;
pub mod webhook;

pub use webhook::LoggingWebhookHandler;
