//! Webhook handlers.
//!
//! ## Commands
//! - Receiving a Tebex webhook (parse, authenticate, dispatch)

mod receive_webhook;

pub use receive_webhook::{ReceiveWebhookCommand, ReceiveWebhookHandler, ReceiveWebhookResult};
