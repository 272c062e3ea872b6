//! Webhook subject payloads.
//!
//! These types represent the `subject` object as it arrives in Tebex payloads.
//! The sender omits or nulls fields freely, so every field tolerates absence.
//! A field whose JSON type does not fit is dropped rather than failing the
//! whole subject; numeric fields also accept numeric strings.

use std::str::FromStr;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::status;

/// Typed subject of a webhook, selected by its event kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WebhookSubject {
    /// Payment, refund, decline and dispute kinds.
    Payment(Box<PaymentSubject>),
    /// All `recurring-payment.*` kinds.
    RecurringPayment(Box<RecurringPaymentSubject>),
    /// `validation.webhook`, which carries nothing.
    Validation,
    /// `basket.abandoned`, passed through untyped.
    BasketAbandoned(Value),
}

impl WebhookSubject {
    /// The payment subject, if this is a payment-family webhook.
    pub fn as_payment(&self) -> Option<&PaymentSubject> {
        match self {
            Self::Payment(payment) => Some(payment),
            _ => None,
        }
    }

    /// The recurring payment subject, if this is a recurring-payment webhook.
    pub fn as_recurring_payment(&self) -> Option<&RecurringPaymentSubject> {
        match self {
            Self::RecurringPayment(recurring) => Some(recurring),
            _ => None,
        }
    }

    /// The untyped basket object, if this is a basket-abandoned webhook.
    pub fn as_basket(&self) -> Option<&Value> {
        match self {
            Self::BasketAbandoned(basket) => Some(basket),
            _ => None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payment Subject
// ════════════════════════════════════════════════════════════════════════════════

/// A single payment as reported by the sender.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentSubject {
    /// Transaction ID (tbx-...).
    #[serde(deserialize_with = "lenient")]
    pub transaction_id: Option<String>,
    /// Current payment status.
    #[serde(deserialize_with = "lenient")]
    pub status: Option<PaymentStatus>,
    /// "oneoff", "recurring" or "mixed".
    #[serde(deserialize_with = "lenient")]
    pub payment_sequence: Option<String>,
    /// When the payment was created (ISO 8601).
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<String>,
    /// Total price.
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Money>,
    /// Amount actually paid.
    #[serde(deserialize_with = "lenient")]
    pub price_paid: Option<Money>,
    /// Payment method used.
    #[serde(deserialize_with = "lenient")]
    pub payment_method: Option<PaymentMethod>,
    /// Tax and gateway fees.
    #[serde(deserialize_with = "lenient")]
    pub fees: Option<PaymentFees>,
    /// Customer who paid.
    #[serde(deserialize_with = "lenient")]
    pub customer: Option<Customer>,
    /// Purchased line items.
    #[serde(deserialize_with = "lenient_items")]
    pub products: Vec<Product>,
    /// Applied coupons.
    #[serde(deserialize_with = "lenient")]
    pub coupons: Vec<Value>,
    /// Applied gift cards.
    #[serde(deserialize_with = "lenient")]
    pub gift_cards: Vec<Value>,
    /// Reference of the recurring payment this payment belongs to.
    #[serde(deserialize_with = "lenient")]
    pub recurring_payment_reference: Option<String>,
    /// Custom data attached to the basket.
    pub custom: Value,
    /// Revenue share entries.
    #[serde(deserialize_with = "lenient")]
    pub revenue_share: Vec<Value>,
    /// Why the payment was declined, for declined payments.
    pub decline_reason: Option<Value>,
}

impl PaymentSubject {
    /// True when the status code maps to the "Complete" label.
    ///
    /// `None` when the subject has no status.
    pub fn is_status_complete(&self) -> Option<bool> {
        self.status.as_ref().map(|s| status::is_complete(s.id))
    }
}

/// Payment status as `{id, description}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentStatus {
    /// Status code, see [`status::label_for`].
    #[serde(deserialize_with = "number")]
    pub id: u32,
    /// Human readable description.
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
}

impl PaymentStatus {
    /// Label from the fixed status table.
    pub fn label(&self) -> Option<&'static str> {
        status::label_for(self.id)
    }
}

/// Monetary amount.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Money {
    /// Amount in major units.
    #[serde(deserialize_with = "number")]
    pub amount: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// Payment method summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentMethod {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub refundable: Option<bool>,
}

/// Fees charged on a payment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PaymentFees {
    #[serde(deserialize_with = "lenient")]
    pub tax: Option<Money>,
    #[serde(deserialize_with = "lenient")]
    pub gateway: Option<Money>,
}

/// Customer details attached to a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Customer {
    #[serde(deserialize_with = "lenient")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub ip: Option<String>,
    pub username: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub marketing_consent: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub postal_code: Option<String>,
}

/// Purchased line item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "lenient_number")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub base_price: Option<Money>,
    #[serde(deserialize_with = "lenient")]
    pub paid_price: Option<Money>,
    pub variables: Value,
    #[serde(deserialize_with = "lenient")]
    pub expires_at: Option<String>,
    pub custom: Option<Value>,
    pub username: Option<Value>,
    #[serde(deserialize_with = "lenient")]
    pub servers: Vec<Value>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Recurring Payment Subject
// ════════════════════════════════════════════════════════════════════════════════

/// A recurring payment (subscription).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecurringPaymentSubject {
    /// Recurring payment reference (tbx-r-...).
    #[serde(deserialize_with = "lenient")]
    pub reference: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub paused_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub paused_until: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub next_payment_at: Option<String>,
    /// Recurring payment status. Codes differ from the payment status table.
    #[serde(deserialize_with = "lenient")]
    pub status: Option<PaymentStatus>,
    /// First payment of the subscription.
    #[serde(deserialize_with = "lenient")]
    pub initial_payment: Option<PaymentSubject>,
    /// Most recent payment of the subscription.
    #[serde(deserialize_with = "lenient")]
    pub last_payment: Option<PaymentSubject>,
    /// Consecutive failed renewal attempts.
    #[serde(deserialize_with = "lenient_number")]
    pub fail_count: Option<u32>,
    /// Renewal price.
    #[serde(deserialize_with = "lenient")]
    pub price: Option<Money>,
    #[serde(deserialize_with = "lenient")]
    pub cancelled_at: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub cancel_reason: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Field Binding
// ════════════════════════════════════════════════════════════════════════════════

/// Binds the field when its value fits `T`, otherwise leaves the default.
///
/// Null and mismatched values both end up as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Like [`lenient`], but drops individual list entries that do not fit.
fn lenient_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// A required number that may arrive as a JSON number or a numeric string.
fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("not a number: {:?}", text))),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

/// An optional number, accepting numeric strings. Anything else is `None`.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text.trim().parse().ok(),
        other => serde_json::from_value(other).ok(),
    })
}
