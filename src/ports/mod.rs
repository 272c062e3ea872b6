//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Webhook Ports
//!
//! - `WebhookEventHandler` - Business reactions to authenticated webhooks

mod webhook_event_handler;

pub use webhook_event_handler::{WebhookEventHandler, WebhookHandlerError};
