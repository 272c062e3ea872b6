//! Webhook envelope parsing.
//!
//! [`Webhook::parse`] turns a raw request body into a typed, immutable
//! envelope. Parsing does not authenticate; pass the result to
//! [`WebhookAuthenticator`](super::WebhookAuthenticator) before acting on it.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::canonical::{canonicalize, CanonicalForm};
use super::errors::WebhookError;
use super::event_type::WebhookType;
use super::subject::WebhookSubject;

/// Webhook identifier, kept exactly as the sender encoded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WebhookId {
    /// String identifier (the usual UUID form).
    Text(String),
    /// Numeric identifier.
    Number(serde_json::Number),
}

impl fmt::Display for WebhookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Transport metadata that accompanies a webhook request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportMeta {
    /// Value of the signature header, if any.
    pub signature: Option<String>,
    /// Source IP of the request as determined by the caller.
    pub source_ip: Option<String>,
}

impl TransportMeta {
    pub fn new(signature: Option<String>, source_ip: Option<String>) -> Self {
        Self {
            signature,
            source_ip,
        }
    }
}

/// A parsed, not yet authenticated, webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct Webhook {
    id: WebhookId,
    event_type: WebhookType,
    date: String,
    subject: WebhookSubject,
    raw_body: Vec<u8>,
    canonical_body: String,
}

impl Webhook {
    /// Parses a raw webhook body.
    ///
    /// # Errors
    ///
    /// In order of checking:
    /// - `MalformedPayload` - not JSON, or not a JSON object
    /// - `MissingType` - `type` absent, null or empty
    /// - `MissingSubject` - no `subject` key
    /// - `NullSubject` - `subject` is null
    /// - `UnrecognizedType` - `type` is not a known kind
    /// - `MissingField` - `id` or `date` absent or of the wrong JSON type
    /// - `InvalidSubject` - a payment or recurring-payment subject that is not an object
    pub fn parse(raw_body: &[u8], form: CanonicalForm) -> Result<Self, WebhookError> {
        let decoded: Value = serde_json::from_slice(raw_body)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        let Value::Object(fields) = &decoded else {
            return Err(WebhookError::MalformedPayload(
                "top-level value is not an object".to_string(),
            ));
        };

        let type_name = match fields.get("type") {
            None | Some(Value::Null) => return Err(WebhookError::MissingType),
            Some(Value::String(s)) if s.is_empty() => return Err(WebhookError::MissingType),
            Some(other) => other,
        };

        let subject = match fields.get("subject") {
            None => return Err(WebhookError::MissingSubject),
            Some(Value::Null) => return Err(WebhookError::NullSubject),
            Some(subject) => subject,
        };

        let event_type: WebhookType = match type_name {
            Value::String(s) => s.parse()?,
            other => return Err(WebhookError::UnrecognizedType(other.to_string())),
        };

        let id = match fields.get("id") {
            Some(Value::String(s)) => WebhookId::Text(s.clone()),
            Some(Value::Number(n)) => WebhookId::Number(n.clone()),
            _ => return Err(WebhookError::MissingField("id")),
        };

        let date = match fields.get("date") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err(WebhookError::MissingField("date")),
        };

        let canonical_body = canonicalize(&decoded, form);
        let subject = bind_subject(event_type, normalize_subject(subject.clone()))?;

        tracing::debug!(
            webhook_id = %id,
            webhook_type = %event_type,
            "Parsed webhook payload"
        );

        Ok(Self {
            id,
            event_type,
            date,
            subject,
            raw_body: raw_body.to_vec(),
            canonical_body,
        })
    }

    pub fn id(&self) -> &WebhookId {
        &self.id
    }

    pub fn event_type(&self) -> WebhookType {
        self.event_type
    }

    /// Send date as provided (ISO 8601, not reparsed).
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn subject(&self) -> &WebhookSubject {
        &self.subject
    }

    /// Body exactly as received.
    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    /// Deterministic re-encoding used only for the signature.
    pub fn canonical_body(&self) -> &str {
        &self.canonical_body
    }

    /// True if this webhook's kind has wire name `type_name`.
    ///
    /// # Errors
    ///
    /// `UnrecognizedType` when `type_name` is not a known kind at all, so typos
    /// in caller code surface instead of silently comparing false.
    pub fn is_type(&self, type_name: &str) -> Result<bool, WebhookError> {
        let kind: WebhookType = type_name.parse()?;
        Ok(self.event_type == kind)
    }

    pub fn is_payment_event(&self) -> bool {
        self.event_type.is_payment_event()
    }

    pub fn is_dispute_event(&self) -> bool {
        self.event_type.is_dispute_event()
    }

    pub fn is_recurring_payment_event(&self) -> bool {
        self.event_type.is_recurring_payment_event()
    }

    pub fn is_validation(&self) -> bool {
        self.event_type == WebhookType::ValidationWebhook
    }

    /// True when the payment subject's status code maps to "Complete".
    ///
    /// # Errors
    ///
    /// `StatusUnavailable` for non-payment subjects and payments without a status.
    pub fn is_status_complete(&self) -> Result<bool, WebhookError> {
        self.subject
            .as_payment()
            .and_then(|payment| payment.is_status_complete())
            .ok_or(WebhookError::StatusUnavailable)
    }
}

/// Forces an empty subject into object shape.
///
/// Some encoders cannot tell `{}` from `[]` and emit the latter for an empty
/// subject. Typed binding always expects an object.
fn normalize_subject(subject: Value) -> Value {
    match subject {
        Value::Array(items) if items.is_empty() => Value::Object(Map::new()),
        other => other,
    }
}

/// Binds the typed subject for the kind.
///
/// Field-level mismatches are tolerated by the subject types; only a subject
/// that is not an object at all is rejected.
fn bind_subject(event_type: WebhookType, subject: Value) -> Result<WebhookSubject, WebhookError> {
    let typed = event_type.is_payment_event()
        || event_type.is_dispute_event()
        || event_type.is_recurring_payment_event();
    if typed && !subject.is_object() {
        return Err(WebhookError::InvalidSubject(format!(
            "expected an object for {}",
            event_type
        )));
    }

    if event_type.is_payment_event() || event_type.is_dispute_event() {
        let payment = serde_json::from_value(subject)
            .map_err(|e| WebhookError::InvalidSubject(e.to_string()))?;
        return Ok(WebhookSubject::Payment(Box::new(payment)));
    }

    if event_type.is_recurring_payment_event() {
        let recurring = serde_json::from_value(subject)
            .map_err(|e| WebhookError::InvalidSubject(e.to_string()))?;
        return Ok(WebhookSubject::RecurringPayment(Box::new(recurring)));
    }

    match event_type {
        WebhookType::ValidationWebhook => Ok(WebhookSubject::Validation),
        WebhookType::BasketAbandoned => Ok(WebhookSubject::BasketAbandoned(subject)),
        other => Err(WebhookError::UnrecognizedType(other.as_str().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYMENT_COMPLETED: &str = r#"{
        "id": "abc123",
        "type": "payment.completed",
        "date": "2023-11-20T01:27:00+00:00",
        "subject": {
            "transaction_id": "txn_456789",
            "status": {"id": 1, "description": "Complete"},
            "price": {"amount": 2.16, "currency": "USD"}
        }
    }"#;

    fn parse(raw: &str) -> Result<Webhook, WebhookError> {
        Webhook::parse(raw.as_bytes(), CanonicalForm::Sorted)
    }

    // ══════════════════════════════════════════════════════════════
    // Successful Parsing
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn parses_payment_completed() {
        let webhook = parse(PAYMENT_COMPLETED).unwrap();

        assert_eq!(webhook.id(), &WebhookId::Text("abc123".to_string()));
        assert_eq!(webhook.event_type(), WebhookType::PaymentCompleted);
        assert_eq!(webhook.date(), "2023-11-20T01:27:00+00:00");
        assert_eq!(webhook.raw_body(), PAYMENT_COMPLETED.as_bytes());

        let payment = webhook.subject().as_payment().unwrap();
        assert_eq!(payment.transaction_id.as_deref(), Some("txn_456789"));
        assert_eq!(payment.price.as_ref().unwrap().amount, 2.16);
        assert_eq!(webhook.is_status_complete(), Ok(true));
    }

    #[test]
    fn canonical_body_is_compact_and_sorted() {
        let webhook = parse(PAYMENT_COMPLETED).unwrap();
        assert_eq!(
            webhook.canonical_body(),
            r#"{"date":"2023-11-20T01:27:00+00:00","id":"abc123","subject":{"price":{"amount":2.16,"currency":"USD"},"status":{"description":"Complete","id":1},"transaction_id":"txn_456789"},"type":"payment.completed"}"#
        );
    }

    #[test]
    fn sender_form_keeps_received_order() {
        let raw = r#"{"id": "a/b", "type": "validation.webhook", "date": "d", "subject": {}}"#;
        let webhook = Webhook::parse(raw.as_bytes(), CanonicalForm::SenderCompatible).unwrap();
        assert_eq!(
            webhook.canonical_body(),
            r#"{"id":"a\/b","type":"validation.webhook","date":"d","subject":{}}"#
        );
    }

    #[test]
    fn numeric_id_is_kept_as_number() {
        let raw = r#"{"id": 12345, "type": "validation.webhook", "date": "2024-01-01", "subject": {}}"#;
        let webhook = parse(raw).unwrap();
        assert_eq!(webhook.id(), &WebhookId::Number(serde_json::Number::from(12345u64)));
        assert_eq!(webhook.id().to_string(), "12345");
    }

    #[test]
    fn validation_subject_is_empty() {
        let raw = r#"{"id": "679e12cd", "type": "validation.webhook", "date": "2024-07-12T14:52:18+00:00", "subject": {}}"#;
        let webhook = parse(raw).unwrap();
        assert!(webhook.is_validation());
        assert_eq!(webhook.subject(), &WebhookSubject::Validation);
    }

    #[test]
    fn empty_array_subject_is_normalized_to_object() {
        let raw = r#"{"id": "1", "type": "payment.refunded", "date": "d", "subject": []}"#;
        let webhook = parse(raw).unwrap();
        assert!(webhook.subject().as_payment().is_some());

        let raw = r#"{"id": "1", "type": "basket.abandoned", "date": "d", "subject": []}"#;
        let webhook = parse(raw).unwrap();
        assert_eq!(
            webhook.subject().as_basket(),
            Some(&Value::Object(Map::new()))
        );
    }

    #[test]
    fn basket_subject_passes_through() {
        let raw = r#"{"id": "1", "type": "basket.abandoned", "date": "d", "subject": {"ident": "x", "n": [1]}}"#;
        let webhook = parse(raw).unwrap();
        assert_eq!(
            webhook.subject().as_basket(),
            Some(&serde_json::json!({"ident": "x", "n": [1]}))
        );
    }

    #[test]
    fn recurring_kind_binds_recurring_subject() {
        let raw = r#"{"id": "1", "type": "recurring-payment.started", "date": "d", "subject": {"reference": "tbx-r-1", "fail_count": 0}}"#;
        let webhook = parse(raw).unwrap();
        assert!(webhook.is_recurring_payment_event());
        assert!(!webhook.is_payment_event());
        let recurring = webhook.subject().as_recurring_payment().unwrap();
        assert_eq!(recurring.reference.as_deref(), Some("tbx-r-1"));
        assert_eq!(webhook.is_status_complete(), Err(WebhookError::StatusUnavailable));
    }

    #[test]
    fn dispute_kind_binds_payment_subject() {
        let raw = r#"{"id": "1", "type": "payment.dispute.opened", "date": "d", "subject": {"status": {"id": 3}}}"#;
        let webhook = parse(raw).unwrap();
        assert!(webhook.is_dispute_event());
        assert_eq!(webhook.is_status_complete(), Ok(false));
    }

    #[test]
    fn extra_top_level_fields_are_ignored() {
        let raw = r#"{"id": "1", "type": "validation.webhook", "date": "d", "subject": {}, "extra": true}"#;
        assert!(parse(raw).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Parse Failures
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn trailing_comma_is_malformed() {
        let raw = r#"{"id": "12345", "type": "payment.completed", "date": "2024-01-01", "subject": {},}"#;
        assert!(matches!(parse(raw), Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn truncated_body_is_malformed() {
        assert!(matches!(
            parse(&PAYMENT_COMPLETED[..40]),
            Err(WebhookError::MalformedPayload(_))
        ));
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(matches!(parse("[1, 2]"), Err(WebhookError::MalformedPayload(_))));
    }

    #[test]
    fn missing_type_fails() {
        let raw = r#"{"id": "12345", "date": "2024-01-01", "subject": {}}"#;
        assert_eq!(parse(raw), Err(WebhookError::MissingType));
    }

    #[test]
    fn empty_type_fails_as_missing() {
        let raw = r#"{"id": "12345", "type": "", "date": "2024-01-01", "subject": {}}"#;
        assert_eq!(parse(raw), Err(WebhookError::MissingType));
    }

    #[test]
    fn missing_subject_fails_before_type_lookup() {
        let raw = r#"{"id": "12345", "type": "nonexisting.class", "date": "2024-01-01"}"#;
        assert_eq!(parse(raw), Err(WebhookError::MissingSubject));
    }

    #[test]
    fn null_subject_fails() {
        let raw = r#"{"id": "12345", "type": "payment.completed", "date": "2024-01-01", "subject": null}"#;
        assert_eq!(parse(raw), Err(WebhookError::NullSubject));
    }

    #[test]
    fn unknown_type_fails() {
        let raw = r#"{"id": "12345", "type": "nonexisting.class", "date": "2024-01-01", "subject": {"foo": "bar"}}"#;
        assert_eq!(
            parse(raw),
            Err(WebhookError::UnrecognizedType("nonexisting.class".to_string()))
        );
    }

    #[test]
    fn numeric_type_is_unrecognized() {
        let raw = r#"{"id": "1", "type": 5, "date": "d", "subject": {}}"#;
        assert_eq!(parse(raw), Err(WebhookError::UnrecognizedType("5".to_string())));
    }

    #[test]
    fn missing_id_and_date_fail() {
        let raw = r#"{"type": "validation.webhook", "date": "d", "subject": {}}"#;
        assert_eq!(parse(raw), Err(WebhookError::MissingField("id")));

        let raw = r#"{"id": "1", "type": "validation.webhook", "subject": {}}"#;
        assert_eq!(parse(raw), Err(WebhookError::MissingField("date")));
    }

    #[test]
    fn mistyped_subject_fields_still_parse() {
        let raw = r#"{"id": "1", "type": "payment.completed", "date": "d", "subject": {"status": "done", "price": {"amount": "2.16", "currency": "USD"}, "products": [{"id": "6340289"}]}}"#;
        let webhook = parse(raw).unwrap();

        let payment = webhook.subject().as_payment().unwrap();
        assert!(payment.status.is_none());
        assert_eq!(payment.price.as_ref().unwrap().amount, 2.16);
        assert_eq!(payment.products[0].id, Some(6340289));
        assert_eq!(webhook.is_status_complete(), Err(WebhookError::StatusUnavailable));
    }

    #[test]
    fn non_object_payment_subject_fails() {
        for subject in [r#""paid""#, "42", "[1, 2]", "true"] {
            let raw = format!(
                r#"{{"id": "1", "type": "payment.completed", "date": "d", "subject": {}}}"#,
                subject
            );
            assert!(matches!(parse(&raw), Err(WebhookError::InvalidSubject(_))));
        }

        let raw = r#"{"id": "1", "type": "recurring-payment.started", "date": "d", "subject": "x"}"#;
        assert!(matches!(parse(raw), Err(WebhookError::InvalidSubject(_))));
    }

    #[test]
    fn untyped_kinds_accept_any_subject_shape() {
        let raw = r#"{"id": "1", "type": "basket.abandoned", "date": "d", "subject": "x"}"#;
        assert!(parse(raw).is_ok());

        let raw = r#"{"id": "1", "type": "validation.webhook", "date": "d", "subject": 7}"#;
        assert!(parse(raw).is_ok());
    }

    // ══════════════════════════════════════════════════════════════
    // Type Helpers
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn is_type_matches_own_kind() {
        let webhook = parse(PAYMENT_COMPLETED).unwrap();
        assert_eq!(webhook.is_type("payment.completed"), Ok(true));
        assert_eq!(webhook.is_type("payment.declined"), Ok(false));
    }

    #[test]
    fn is_type_rejects_unknown_names() {
        let webhook = parse(PAYMENT_COMPLETED).unwrap();
        assert!(matches!(
            webhook.is_type("invalid"),
            Err(WebhookError::UnrecognizedType(_))
        ));
    }

    #[test]
    fn helpers_do_not_depend_on_call_order() {
        let webhook = parse(PAYMENT_COMPLETED).unwrap();
        let first = (
            webhook.is_payment_event(),
            webhook.is_dispute_event(),
            webhook.is_recurring_payment_event(),
        );
        let _ = webhook.is_status_complete();
        let second = (
            webhook.is_payment_event(),
            webhook.is_dispute_event(),
            webhook.is_recurring_payment_event(),
        );
        assert_eq!(first, (true, false, false));
        assert_eq!(first, second);
    }
}
