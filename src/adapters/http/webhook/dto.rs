//! HTTP DTOs (Data Transfer Objects) for the webhook endpoint.

use serde::Serialize;

use crate::domain::webhook::{WebhookError, WebhookId};

/// Body returned for a validation webhook. The sender expects its id echoed.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResponse {
    pub id: WebhookId,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&WebhookError> for ErrorResponse {
    fn from(err: &WebhookError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_response_echoes_text_id() {
        let response = ValidationResponse {
            id: WebhookId::Text("679e12cd".to_string()),
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"id": "679e12cd"}));
    }

    #[test]
    fn validation_response_keeps_numeric_id() {
        let response = ValidationResponse {
            id: WebhookId::Number(serde_json::Number::from(42u64)),
        };
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"id": 42}));
    }

    #[test]
    fn error_response_from_webhook_error() {
        let response = ErrorResponse::from(&WebhookError::InvalidSignature);
        assert_eq!(response.code, "INVALID_SIGNATURE");
        assert_eq!(response.message, "Invalid webhook signature");
    }
}
