//! Webhook configuration

use std::net::IpAddr;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{CanonicalForm, WebhookAuthenticator, DEFAULT_ALLOWED_IPS};

/// Webhook receiver configuration (Tebex)
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    /// Webhook signing secret from the Tebex control panel
    #[serde(default = "empty_secret")]
    pub secret: SecretString,

    /// Trusted sender IPs (comma-separated)
    #[serde(default = "default_allowed_ips")]
    pub allowed_ips: String,

    /// Canonical body form used for signatures ("sorted" or "sender")
    #[serde(default)]
    pub canonical_form: CanonicalForm,

    /// Read the source IP from `X-Forwarded-For` when the peer is a trusted proxy
    #[serde(default)]
    pub trust_forwarded_for: bool,

    /// Reverse proxies allowed to set `X-Forwarded-For` (comma-separated)
    #[serde(default)]
    pub trusted_proxies: String,

    /// Enforce the source IP allow-list
    #[serde(default = "default_verify_origin")]
    pub verify_origin: bool,
}

impl WebhookConfig {
    /// Parse the allow-list into addresses
    pub fn allowed_ip_list(&self) -> Result<Vec<IpAddr>, ValidationError> {
        parse_ip_list(&self.allowed_ips, ValidationError::InvalidAllowedIp)
    }

    /// Proxies whose `X-Forwarded-For` is honoured.
    ///
    /// Empty unless `trust_forwarded_for` is set.
    pub fn forwarded_for_proxies(&self) -> Result<Vec<IpAddr>, ValidationError> {
        if !self.trust_forwarded_for {
            return Ok(Vec::new());
        }
        parse_ip_list(&self.trusted_proxies, ValidationError::InvalidTrustedProxy)
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK__SECRET"));
        }

        let ips = self.allowed_ip_list()?;
        if self.verify_origin && ips.is_empty() {
            return Err(ValidationError::EmptyAllowList);
        }

        if self.trust_forwarded_for && self.forwarded_for_proxies()?.is_empty() {
            return Err(ValidationError::NoTrustedProxies);
        }

        Ok(())
    }

    /// Build the authenticator described by this configuration
    pub fn authenticator(&self) -> Result<WebhookAuthenticator, ValidationError> {
        let auth = WebhookAuthenticator::new(self.secret.clone(), self.allowed_ip_list()?);
        if self.verify_origin {
            Ok(auth)
        } else {
            Ok(auth.without_origin_check())
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: empty_secret(),
            allowed_ips: default_allowed_ips(),
            canonical_form: CanonicalForm::default(),
            trust_forwarded_for: false,
            trusted_proxies: String::new(),
            verify_origin: default_verify_origin(),
        }
    }
}

/// Comma-separated addresses, canonicalised so IPv4-mapped IPv6 compares as IPv4.
fn parse_ip_list(
    raw: &str,
    invalid: fn(String) -> ValidationError,
) -> Result<Vec<IpAddr>, ValidationError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<IpAddr>()
                .map(|ip| ip.to_canonical())
                .map_err(|_| invalid(s.to_string()))
        })
        .collect()
}

fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_allowed_ips() -> String {
    DEFAULT_ALLOWED_IPS.join(",")
}

fn default_verify_origin() -> bool {
    true
}
