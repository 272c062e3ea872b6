//! Property-based tests for webhook parsing, canonicalization and signatures.
//!
//! Uses proptest to generate arbitrary payloads and verify invariants that
//! must hold for every input, not just the fixtures.

use proptest::prelude::*;
use secrecy::SecretString;
use serde_json::{Map, Value};

use tebex_webhooks::domain::webhook::{
    canonicalize, CanonicalForm, Webhook, WebhookAuthenticator, WebhookError, WebhookType,
};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Strategy for generating JSON values without floats (exact round trips).
fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_/é]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Strategy for generating object entries with unique keys.
fn arb_entries() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::btree_map("[a-z0-9_.-]{1,10}", arb_json_value(), 0..8)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_webhook_type() -> impl Strategy<Value = WebhookType> {
    prop::sample::select(WebhookType::ALL.to_vec())
}

fn object(entries: impl IntoIterator<Item = (String, Value)>) -> Value {
    Value::Object(entries.into_iter().collect::<Map<String, Value>>())
}

fn envelope(id: &str, kind: WebhookType, subject: Value) -> Vec<u8> {
    let value = serde_json::json!({
        "id": id,
        "type": kind.as_str(),
        "date": "2024-07-12T14:52:18+00:00",
        "subject": subject,
    });
    serde_json::to_vec(&value).unwrap()
}

// ============================================================================
// CANONICALIZATION
// ============================================================================

proptest! {
    #[test]
    fn sorted_form_ignores_key_order(entries in arb_entries()) {
        let forward = object(entries.clone());
        let backward = object(entries.into_iter().rev());

        prop_assert_eq!(
            canonicalize(&forward, CanonicalForm::Sorted),
            canonicalize(&backward, CanonicalForm::Sorted)
        );
    }

    #[test]
    fn canonical_output_decodes_to_same_value(value in arb_json_value()) {
        for form in [CanonicalForm::Sorted, CanonicalForm::SenderCompatible] {
            let encoded = canonicalize(&value, form);
            let decoded: Value = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(&decoded, &value);
        }
    }

    #[test]
    fn canonicalization_is_deterministic(value in arb_json_value()) {
        prop_assert_eq!(
            canonicalize(&value, CanonicalForm::Sorted),
            canonicalize(&value.clone(), CanonicalForm::Sorted)
        );
    }

    #[test]
    fn sender_form_is_pure_ascii(value in arb_json_value()) {
        let encoded = canonicalize(&value, CanonicalForm::SenderCompatible);
        prop_assert!(encoded.is_ascii());
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

proptest! {
    #[test]
    fn every_kind_parses_with_empty_subject(kind in arb_webhook_type(), id in "[a-f0-9-]{1,36}") {
        let webhook = Webhook::parse(&envelope(&id, kind, serde_json::json!({})), CanonicalForm::Sorted)
            .unwrap();

        prop_assert_eq!(webhook.event_type(), kind);
        prop_assert_eq!(webhook.is_type(kind.as_str()), Ok(true));
        prop_assert!(!(webhook.is_payment_event() && webhook.is_recurring_payment_event()));
        if webhook.is_dispute_event() {
            prop_assert!(webhook.is_payment_event());
        }
    }

    #[test]
    fn any_object_subject_parses(kind in arb_webhook_type(), entries in arb_entries()) {
        let subject = object(entries);
        let result = Webhook::parse(&envelope("evt", kind, subject), CanonicalForm::Sorted);
        prop_assert!(result.is_ok(), "{:?}", result.err());
    }

    #[test]
    fn unknown_type_names_are_rejected(name in "[a-z]{1,12}\\.[a-z]{1,12}") {
        prop_assume!(name.parse::<WebhookType>().is_err());
        let raw = serde_json::json!({"id": "1", "type": name.clone(), "date": "d", "subject": {}});
        let result = Webhook::parse(raw.to_string().as_bytes(), CanonicalForm::Sorted);
        prop_assert_eq!(result, Err(WebhookError::UnrecognizedType(name)));
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Err(err) = Webhook::parse(&bytes, CanonicalForm::Sorted) {
            prop_assert!(err.is_parse_error());
        }
    }
}

// ============================================================================
// SIGNATURES
// ============================================================================

proptest! {
    #[test]
    fn any_single_character_change_breaks_signature(
        kind in arb_webhook_type(),
        position in 0usize..64,
        replacement in prop::sample::select(b"0123456789abcdef".to_vec()),
    ) {
        let auth = WebhookAuthenticator::with_default_ips(SecretString::new("abc123".to_string()));
        let webhook = Webhook::parse(&envelope("evt", kind, serde_json::json!({})), CanonicalForm::Sorted)
            .unwrap();
        let signature = auth.compute_signature(&webhook).unwrap();

        let mut bytes = signature.clone().into_bytes();
        prop_assume!(bytes[position] != replacement);
        bytes[position] = replacement;
        let tampered = String::from_utf8(bytes).unwrap();

        prop_assert!(auth.verify_signature(&webhook, Some(&signature)).is_ok());
        prop_assert_eq!(
            auth.verify_signature(&webhook, Some(&tampered)),
            Err(WebhookError::InvalidSignature)
        );
    }

    #[test]
    fn reordered_envelope_keeps_signature(kind in arb_webhook_type(), id in "[a-z0-9]{1,16}") {
        let auth = WebhookAuthenticator::with_default_ips(SecretString::new("abc123".to_string()));

        let forward = format!(
            r#"{{"id":"{}","type":"{}","date":"d","subject":{{}}}}"#,
            id, kind.as_str()
        );
        let backward = format!(
            r#"{{"subject":{{}},"date":"d","type":"{}","id":"{}"}}"#,
            kind.as_str(), id
        );

        let a = Webhook::parse(forward.as_bytes(), CanonicalForm::Sorted).unwrap();
        let b = Webhook::parse(backward.as_bytes(), CanonicalForm::Sorted).unwrap();
        prop_assert_eq!(
            auth.compute_signature(&a).unwrap(),
            auth.compute_signature(&b).unwrap()
        );
    }
}
