//! Webhook event handler adapters.

mod logging;

pub use logging::LoggingWebhookHandler;
