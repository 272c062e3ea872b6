//! ReceiveWebhookHandler - Command handler for incoming Tebex webhooks.

use std::sync::Arc;

use crate::domain::webhook::{
    CanonicalForm, TransportMeta, Webhook, WebhookAuthenticator, WebhookError, WebhookId,
    WebhookSubject, WebhookType,
};
use crate::ports::WebhookEventHandler;

/// Command to receive a webhook.
#[derive(Debug, Clone)]
pub struct ReceiveWebhookCommand {
    /// Raw request body.
    pub payload: Vec<u8>,
    /// Signature header and source IP.
    pub transport: TransportMeta,
}

/// Result of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveWebhookResult {
    /// Validation ping answered; the sender expects the id echoed back.
    ValidationAcknowledged { id: WebhookId },
    /// Webhook authenticated and dispatched to the event handler.
    Processed {
        id: WebhookId,
        event_type: WebhookType,
    },
}

/// Handler for receiving webhooks.
///
/// Parses, authenticates, then dispatches to a [`WebhookEventHandler`].
/// Nothing is dispatched unless both authentication gates pass.
pub struct ReceiveWebhookHandler {
    authenticator: Arc<WebhookAuthenticator>,
    canonical_form: CanonicalForm,
    event_handler: Arc<dyn WebhookEventHandler>,
}

impl ReceiveWebhookHandler {
    pub fn new(
        authenticator: Arc<WebhookAuthenticator>,
        canonical_form: CanonicalForm,
        event_handler: Arc<dyn WebhookEventHandler>,
    ) -> Self {
        Self {
            authenticator,
            canonical_form,
            event_handler,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReceiveWebhookCommand,
    ) -> Result<ReceiveWebhookResult, WebhookError> {
        // 1. Parse and classify
        let webhook = Webhook::parse(&cmd.payload, self.canonical_form)?;

        // 2. Both gates, before anything else looks at the content
        self.authenticator.authenticate(&webhook, &cmd.transport)?;

        // 3. Dispatch
        let id = webhook.id().clone();
        let event_type = webhook.event_type();

        if webhook.is_validation() {
            tracing::info!(webhook_id = %id, "Validation webhook acknowledged");
            return Ok(ReceiveWebhookResult::ValidationAcknowledged { id });
        }

        self.dispatch(&webhook).await?;

        tracing::info!(
            webhook_id = %id,
            webhook_type = %event_type,
            "Webhook processed"
        );
        Ok(ReceiveWebhookResult::Processed { id, event_type })
    }

    async fn dispatch(&self, webhook: &Webhook) -> Result<(), WebhookError> {
        let result = match webhook.subject() {
            WebhookSubject::Payment(payment) if webhook.is_dispute_event() => {
                self.event_handler.on_dispute(webhook, payment).await
            }
            WebhookSubject::Payment(payment) => {
                self.event_handler.on_payment(webhook, payment).await
            }
            WebhookSubject::RecurringPayment(recurring) => {
                self.event_handler
                    .on_recurring_payment(webhook, recurring)
                    .await
            }
            WebhookSubject::BasketAbandoned(basket) => {
                self.event_handler.on_basket_abandoned(webhook, basket).await
            }
            WebhookSubject::Validation => Ok(()),
        };

        result.map_err(|e| {
            tracing::error!(
                webhook_id = %webhook.id(),
                webhook_type = %webhook.event_type(),
                error = %e,
                "Webhook handler failed"
            );
            WebhookError::HandlerFailed(e.to_string())
        })
    }
}
