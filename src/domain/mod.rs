//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `webhook` - Tebex webhook parsing, classification and authentication

pub mod webhook;
