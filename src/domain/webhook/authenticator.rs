//! Webhook authentication.
//!
//! A webhook is accepted only when both gates pass:
//!
//! - the request came from an allow-listed source IP
//! - the `X-Signature` header equals
//!   `hex(HMAC_SHA256(secret, hex(SHA256(canonical_body))))`
//!
//! # Security
//!
//! - Signatures are compared in constant time
//! - Both gates are always evaluated so timing does not reveal which failed
//! - The secret is held as `secrecy::SecretString` and never logged

use std::net::IpAddr;

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::envelope::{TransportMeta, Webhook};
use super::errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Default Tebex sender addresses.
pub const DEFAULT_ALLOWED_IPS: [&str; 2] = ["18.209.80.3", "54.87.231.232"];

/// Verifies origin and signature of parsed webhooks.
#[derive(Clone)]
pub struct WebhookAuthenticator {
    secret: SecretString,
    allowed_ips: Vec<IpAddr>,
    check_origin: bool,
}

impl std::fmt::Debug for WebhookAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookAuthenticator")
            .field("secret", &"[REDACTED]")
            .field("allowed_ips", &self.allowed_ips)
            .field("check_origin", &self.check_origin)
            .finish()
    }
}

impl WebhookAuthenticator {
    /// Create an authenticator for `secret` and the given source allow-list.
    ///
    /// IPv4-mapped IPv6 entries are stored as plain IPv4.
    pub fn new(secret: SecretString, allowed_ips: Vec<IpAddr>) -> Self {
        Self {
            secret,
            allowed_ips: allowed_ips.into_iter().map(|ip| ip.to_canonical()).collect(),
            check_origin: true,
        }
    }

    /// Create an authenticator that trusts the default sender addresses.
    pub fn with_default_ips(secret: SecretString) -> Self {
        let allowed_ips = DEFAULT_ALLOWED_IPS
            .iter()
            .filter_map(|ip| ip.parse().ok())
            .collect();
        Self::new(secret, allowed_ips)
    }

    /// Disable the origin gate. The signature gate still applies.
    ///
    /// Intended for local development behind tunnels that rewrite source IPs.
    pub fn without_origin_check(mut self) -> Self {
        tracing::warn!("Webhook origin check disabled; only signatures are verified");
        self.check_origin = false;
        self
    }

    pub fn allowed_ips(&self) -> &[IpAddr] {
        &self.allowed_ips
    }

    pub fn checks_origin(&self) -> bool {
        self.check_origin
    }

    /// Run both gates against a parsed webhook.
    ///
    /// # Errors
    ///
    /// - `SecretNotConfigured` when the secret is empty
    /// - `UntrustedOrigin` when the source IP is missing or not allow-listed
    /// - `InvalidSignature` when the signature header is missing or wrong
    ///
    /// When both gates fail, `UntrustedOrigin` is reported.
    pub fn authenticate(
        &self,
        webhook: &Webhook,
        transport: &TransportMeta,
    ) -> Result<(), WebhookError> {
        self.ensure_secret()?;

        let origin = self.verify_origin(transport.source_ip.as_deref());
        let signature = self.verify_signature(webhook, transport.signature.as_deref());

        origin?;
        signature?;

        tracing::debug!(
            webhook_id = %webhook.id(),
            webhook_type = %webhook.event_type(),
            "Webhook authenticated"
        );
        Ok(())
    }

    /// Check `source_ip` against the allow-list.
    pub fn verify_origin(&self, source_ip: Option<&str>) -> Result<(), WebhookError> {
        if !self.check_origin {
            return Ok(());
        }

        let trusted = source_ip
            .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
            .map(|ip| ip.to_canonical())
            .is_some_and(|ip| self.allowed_ips.contains(&ip));

        if !trusted {
            tracing::warn!(
                source_ip = source_ip.unwrap_or("<none>"),
                "Webhook from untrusted origin"
            );
            return Err(WebhookError::UntrustedOrigin);
        }

        Ok(())
    }

    /// Check the signature header against the webhook's canonical body.
    pub fn verify_signature(
        &self,
        webhook: &Webhook,
        signature: Option<&str>,
    ) -> Result<(), WebhookError> {
        let expected = self.compute_signature(webhook)?;

        let provided = match signature {
            Some(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!(webhook_id = %webhook.id(), "Webhook signature header missing");
                return Err(WebhookError::InvalidSignature);
            }
        };

        if expected.as_bytes().ct_eq(provided.as_bytes()).unwrap_u8() != 1 {
            tracing::warn!(webhook_id = %webhook.id(), "Invalid webhook signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Compute the signature the sender would attach to `webhook`.
    pub fn compute_signature(&self, webhook: &Webhook) -> Result<String, WebhookError> {
        self.sign(webhook.canonical_body())
    }

    /// Sign an already canonical body.
    pub fn sign(&self, canonical_body: &str) -> Result<String, WebhookError> {
        self.ensure_secret()?;

        let body_hash = hex::encode(Sha256::digest(canonical_body.as_bytes()));

        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::SecretNotConfigured)?;
        mac.update(body_hash.as_bytes());

        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn ensure_secret(&self) -> Result<(), WebhookError> {
        if self.secret.expose_secret().is_empty() {
            tracing::error!("Webhook secret is not configured");
            return Err(WebhookError::SecretNotConfigured);
        }
        Ok(())
    }
}
