//! Tebex Webhooks - Receiver for Tebex payment webhooks
//!
//! This crate parses Tebex webhook payloads into typed events and
//! authenticates them by source IP and HMAC-SHA256 signature before any
//! business handler sees them.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
