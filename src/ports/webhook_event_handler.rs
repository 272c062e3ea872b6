//! WebhookEventHandler port - Interface for business reactions to webhooks.
//!
//! Only authenticated webhooks reach this port. Validation pings are
//! answered by the receiver and never dispatched.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::webhook::{PaymentSubject, RecurringPaymentSubject, Webhook};

/// Failure reported by a webhook event handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct WebhookHandlerError(pub String);

impl WebhookHandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Port for reacting to authenticated webhooks.
///
/// Each method receives the full envelope together with the already bound
/// subject, so implementations never re-inspect the subject variant.
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl WebhookEventHandler for FulfilmentHandler {
///     async fn on_payment(&self, webhook: &Webhook, payment: &PaymentSubject)
///         -> Result<(), WebhookHandlerError>
///     {
///         if webhook.is_status_complete().unwrap_or(false) {
///             self.deliver(payment).await?;
///         }
///         Ok(())
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait WebhookEventHandler: Send + Sync {
    /// Payment completed, declined or refunded.
    async fn on_payment(
        &self,
        webhook: &Webhook,
        payment: &PaymentSubject,
    ) -> Result<(), WebhookHandlerError>;

    /// Any `payment.dispute.*` event.
    async fn on_dispute(
        &self,
        webhook: &Webhook,
        payment: &PaymentSubject,
    ) -> Result<(), WebhookHandlerError>;

    /// Any `recurring-payment.*` event.
    async fn on_recurring_payment(
        &self,
        webhook: &Webhook,
        recurring: &RecurringPaymentSubject,
    ) -> Result<(), WebhookHandlerError>;

    /// Basket abandoned before checkout. The basket is passed through untyped.
    async fn on_basket_abandoned(
        &self,
        webhook: &Webhook,
        basket: &serde_json::Value,
    ) -> Result<(), WebhookHandlerError>;
}
