//! Serde helpers for the loosely-typed integers found in game data.
//!
//! Definition ids show up both as JSON numbers and as numeric strings,
//! depending on which tool wrote the file.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Text(String),
}

/// Deserializes an `i64` from either a JSON number or a numeric string.
pub fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::Text(text) => parse_int(&text)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {text:?}"))),
    }
}

/// Parses a definition id written as text.
pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Reads a definition id out of an arbitrary JSON value.
pub fn int_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => parse_int(s),
        _ => None,
    }
}
