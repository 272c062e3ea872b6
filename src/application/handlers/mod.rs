//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod webhook;

pub use webhook::{ReceiveWebhookCommand, ReceiveWebhookHandler, ReceiveWebhookResult};
