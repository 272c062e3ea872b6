//! Logging webhook handler.
//!
//! Default [`WebhookEventHandler`] used by the server binary. It records each
//! authenticated webhook with `tracing` and takes no further action. Replace it
//! with a handler that fulfils purchases to act on events.

use async_trait::async_trait;

use crate::domain::webhook::{PaymentSubject, RecurringPaymentSubject, Webhook};
use crate::ports::{WebhookEventHandler, WebhookHandlerError};

/// Logs every dispatched webhook.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingWebhookHandler;

impl LoggingWebhookHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WebhookEventHandler for LoggingWebhookHandler {
    async fn on_payment(
        &self,
        webhook: &Webhook,
        payment: &PaymentSubject,
    ) -> Result<(), WebhookHandlerError> {
        tracing::info!(
            webhook_id = %webhook.id(),
            webhook_type = %webhook.event_type(),
            transaction_id = payment.transaction_id.as_deref().unwrap_or("-"),
            status = payment.status.as_ref().and_then(|s| s.label()).unwrap_or("-"),
            complete = webhook.is_status_complete().unwrap_or(false),
            "Payment webhook received"
        );
        Ok(())
    }

    async fn on_dispute(
        &self,
        webhook: &Webhook,
        payment: &PaymentSubject,
    ) -> Result<(), WebhookHandlerError> {
        tracing::warn!(
            webhook_id = %webhook.id(),
            webhook_type = %webhook.event_type(),
            transaction_id = payment.transaction_id.as_deref().unwrap_or("-"),
            "Payment dispute webhook received"
        );
        Ok(())
    }

    async fn on_recurring_payment(
        &self,
        webhook: &Webhook,
        recurring: &RecurringPaymentSubject,
    ) -> Result<(), WebhookHandlerError> {
        tracing::info!(
            webhook_id = %webhook.id(),
            webhook_type = %webhook.event_type(),
            reference = recurring.reference.as_deref().unwrap_or("-"),
            fail_count = recurring.fail_count.unwrap_or(0),
            "Recurring payment webhook received"
        );
        Ok(())
    }

    async fn on_basket_abandoned(
        &self,
        webhook: &Webhook,
        basket: &serde_json::Value,
    ) -> Result<(), WebhookHandlerError> {
        tracing::info!(
            webhook_id = %webhook.id(),
            basket_ident = basket.get("ident").and_then(|v| v.as_str()).unwrap_or("-"),
            "Basket abandoned webhook received"
        );
        Ok(())
    }
}
