//! Webhook event kinds.
//!
//! The sender uses a fixed set of dotted type names. Each name decides which
//! subject shape the payload carries.

use std::fmt;
use std::str::FromStr;

use super::errors::WebhookError;

/// Known Tebex webhook event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WebhookType {
    /// A payment was completed.
    PaymentCompleted,
    /// A payment was declined.
    PaymentDeclined,
    /// A payment was refunded.
    PaymentRefunded,
    /// A dispute was opened against a payment.
    PaymentDisputeOpened,
    /// A dispute was won.
    PaymentDisputeWon,
    /// A dispute was lost.
    PaymentDisputeLost,
    /// A dispute was closed.
    PaymentDisputeClosed,
    /// A recurring payment (subscription) started.
    RecurringPaymentStarted,
    /// A recurring payment was renewed.
    RecurringPaymentRenewed,
    /// A recurring payment changed status.
    RecurringPaymentStatusChanged,
    /// A recurring payment ended.
    RecurringPaymentEnded,
    /// The customer asked to cancel a recurring payment.
    RecurringPaymentCancellationRequested,
    /// A pending cancellation was withdrawn.
    RecurringPaymentCancellationAborted,
    /// A basket was abandoned before checkout.
    BasketAbandoned,
    /// Endpoint validation ping.
    ValidationWebhook,
}

impl WebhookType {
    /// Every known kind, in wire order.
    pub const ALL: [WebhookType; 15] = [
        Self::PaymentCompleted,
        Self::PaymentDeclined,
        Self::PaymentRefunded,
        Self::PaymentDisputeOpened,
        Self::PaymentDisputeWon,
        Self::PaymentDisputeLost,
        Self::PaymentDisputeClosed,
        Self::RecurringPaymentStarted,
        Self::RecurringPaymentRenewed,
        Self::RecurringPaymentStatusChanged,
        Self::RecurringPaymentEnded,
        Self::RecurringPaymentCancellationRequested,
        Self::RecurringPaymentCancellationAborted,
        Self::BasketAbandoned,
        Self::ValidationWebhook,
    ];

    /// Convert to the wire type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentCompleted => "payment.completed",
            Self::PaymentDeclined => "payment.declined",
            Self::PaymentRefunded => "payment.refunded",
            Self::PaymentDisputeOpened => "payment.dispute.opened",
            Self::PaymentDisputeWon => "payment.dispute.won",
            Self::PaymentDisputeLost => "payment.dispute.lost",
            Self::PaymentDisputeClosed => "payment.dispute.closed",
            Self::RecurringPaymentStarted => "recurring-payment.started",
            Self::RecurringPaymentRenewed => "recurring-payment.renewed",
            Self::RecurringPaymentStatusChanged => "recurring-payment.status-changed",
            Self::RecurringPaymentEnded => "recurring-payment.ended",
            Self::RecurringPaymentCancellationRequested => {
                "recurring-payment.cancellation.requested"
            }
            Self::RecurringPaymentCancellationAborted => "recurring-payment.cancellation.aborted",
            Self::BasketAbandoned => "basket.abandoned",
            Self::ValidationWebhook => "validation.webhook",
        }
    }

    /// True for one-off payment kinds, disputes included.
    ///
    /// Recurring-payment kinds also contain "payment" and are excluded.
    pub fn is_payment_event(&self) -> bool {
        let name = self.as_str();
        name.contains("payment") && !name.contains("recurring")
    }

    /// True for any `payment.dispute.*` kind.
    pub fn is_dispute_event(&self) -> bool {
        self.as_str().contains("dispute")
    }

    /// True for any `recurring-payment.*` kind.
    pub fn is_recurring_payment_event(&self) -> bool {
        self.as_str().contains("recurring-payment")
    }
}

impl FromStr for WebhookType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| WebhookError::UnrecognizedType(s.to_string()))
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
