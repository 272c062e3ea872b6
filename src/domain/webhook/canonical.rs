//! Canonical JSON encoding used as the signature input.
//!
//! The raw body may be pretty-printed or reordered by proxies, so the signature
//! is computed over a compact re-encoding of the decoded value instead.
//!
//! Two forms exist:
//!
//! - [`CanonicalForm::Sorted`] sorts object keys bytewise. Payloads that decode
//!   to the same value always produce the same string.
//! - [`CanonicalForm::SenderCompatible`] keeps keys in the order received and
//!   escapes `/` and non-ASCII characters the way the sender's encoder does.

use std::fmt::Write as _;

use serde::Deserialize;
use serde_json::Value;

/// Key ordering and escaping rules for the canonical body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalForm {
    /// Compact, keys sorted bytewise, standard JSON escaping.
    #[default]
    Sorted,
    /// Compact, keys in received order, `\/` and `\uXXXX` escaping.
    #[serde(rename = "sender")]
    SenderCompatible,
}

/// Encodes `value` deterministically according to `form`.
pub fn canonicalize(value: &Value, form: CanonicalForm) -> String {
    let mut out = String::new();
    write_value(&mut out, value, form);
    out
}

fn write_value(out: &mut String, value: &Value, form: CanonicalForm) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => write_string(out, s, form),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, form);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            if form == CanonicalForm::Sorted {
                entries.sort_by(|a, b| a.0.cmp(b.0));
            }

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key, form);
                out.push(':');
                write_value(out, item, form);
            }
            out.push('}');
        }
    }
}

fn write_string(out: &mut String, s: &str, form: CanonicalForm) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            '/' if form == CanonicalForm::SenderCompatible => out.push_str("\\/"),
            c if !c.is_ascii() && form == CanonicalForm::SenderCompatible => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
