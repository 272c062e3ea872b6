//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid IP address in webhook allow-list: {0}")]
    InvalidAllowedIp(String),

    #[error("Invalid IP address in trusted proxy list: {0}")]
    InvalidTrustedProxy(String),

    #[error("X-Forwarded-For is trusted but no trusted proxies are configured")]
    NoTrustedProxies,

    #[error("Webhook allow-list is empty while origin checking is enabled")]
    EmptyAllowList,

    #[error("Webhook origin checking cannot be disabled in production")]
    OriginCheckRequiredInProduction,
}
