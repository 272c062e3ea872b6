//! Webhook error types for Tebex webhook handling.
//!
//! Every failure of the parse or authenticate step is a distinct variant so the
//! caller can pick the transport response. Parse-time errors map to 400 and
//! authentication errors to 403.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while receiving a webhook.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// Body is not valid JSON or is not a JSON object.
    #[error("Invalid or malformed webhook JSON: {0}")]
    MalformedPayload(String),

    /// The `type` field is absent, null or empty.
    #[error("Webhook type is missing from the payload")]
    MissingType,

    /// The `subject` key is absent.
    #[error("Webhook is missing subject from the payload")]
    MissingSubject,

    /// The `subject` key is present but null.
    #[error("Webhook subject is null in payload")]
    NullSubject,

    /// The `type` value is not one of the known event kinds.
    #[error("Unrecognized webhook type: {0}")]
    UnrecognizedType(String),

    /// A required envelope field is absent or has the wrong JSON type.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The subject could not be bound to the typed payload for its kind.
    #[error("Invalid webhook subject: {0}")]
    InvalidSubject(String),

    /// The reported source IP is absent or not in the allow-list.
    #[error("Invalid webhook origin IP")]
    UntrustedOrigin,

    /// The supplied signature is absent or does not match.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// The webhook secret is empty.
    #[error("Webhook secret key is not configured")]
    SecretNotConfigured,

    /// The subject has no payment status to inspect.
    #[error("Webhook subject has no payment status")]
    StatusUnavailable,

    /// The downstream event handler failed.
    #[error("Webhook handler failed: {0}")]
    HandlerFailed(String),
}

impl WebhookError {
    /// Returns true for failures raised while parsing the payload.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            WebhookError::MalformedPayload(_)
                | WebhookError::MissingType
                | WebhookError::MissingSubject
                | WebhookError::NullSubject
                | WebhookError::UnrecognizedType(_)
                | WebhookError::MissingField(_)
                | WebhookError::InvalidSubject(_)
        )
    }

    /// Returns true for failures raised while authenticating the request.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            WebhookError::UntrustedOrigin
                | WebhookError::InvalidSignature
                | WebhookError::SecretNotConfigured
        )
    }

    /// Short machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            WebhookError::MissingType => "MISSING_TYPE",
            WebhookError::MissingSubject => "MISSING_SUBJECT",
            WebhookError::NullSubject => "NULL_SUBJECT",
            WebhookError::UnrecognizedType(_) => "UNRECOGNIZED_TYPE",
            WebhookError::MissingField(_) => "MISSING_FIELD",
            WebhookError::InvalidSubject(_) => "INVALID_SUBJECT",
            WebhookError::UntrustedOrigin => "UNTRUSTED_ORIGIN",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::SecretNotConfigured => "SECRET_NOT_CONFIGURED",
            WebhookError::StatusUnavailable => "STATUS_UNAVAILABLE",
            WebhookError::HandlerFailed(_) => "HANDLER_FAILED",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// A missing secret is a server misconfiguration, not the sender's fault.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::UntrustedOrigin | WebhookError::InvalidSignature => {
                StatusCode::FORBIDDEN
            }
            WebhookError::StatusUnavailable | WebhookError::HandlerFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
