//! Tebex webhook domain.
//!
//! Parsing turns a raw body into a typed [`Webhook`]; authentication checks
//! its origin and signature. The two steps are independent and callers are
//! expected to run both before acting on a webhook.
//!
//! ```
//! use secrecy::SecretString;
//! use tebex_webhooks::domain::webhook::{
//!     CanonicalForm, TransportMeta, Webhook, WebhookAuthenticator,
//! };
//!
//! let body = br#"{"id":"1","type":"validation.webhook","date":"2024-01-01","subject":{}}"#;
//! let webhook = Webhook::parse(body, CanonicalForm::Sorted).unwrap();
//!
//! let auth = WebhookAuthenticator::with_default_ips(SecretString::new("abc123".into()));
//! let signature = auth.compute_signature(&webhook).unwrap();
//! let transport = TransportMeta::new(Some(signature), Some("18.209.80.3".into()));
//! assert!(auth.authenticate(&webhook, &transport).is_ok());
//! ```

mod authenticator;
mod canonical;
mod envelope;
mod errors;
mod event_type;
pub mod status;
mod subject;

pub use authenticator::{WebhookAuthenticator, DEFAULT_ALLOWED_IPS};
pub use canonical::{canonicalize, CanonicalForm};
pub use envelope::{TransportMeta, Webhook, WebhookId};
pub use errors::WebhookError;
pub use event_type::WebhookType;
pub use subject::{
    Customer, Money, PaymentFees, PaymentMethod, PaymentStatus, PaymentSubject, Product,
    RecurringPaymentSubject, WebhookSubject,
};
