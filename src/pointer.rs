//! JSON pointer (RFC 6901) lookups over an untyped envelope.
//!
//! Lookups report *why* a value is unusable instead of coercing it, and the
//! `*_or_default` helpers implement the zero-value degrade the handlers rely
//! on.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("invalid pointer: {0}")]
    Invalid(String),
    #[error("no value at {0}")]
    Missing(String),
    #[error("value at {pointer} is not {expected}")]
    WrongType {
        pointer: String,
        expected: &'static str,
    },
}

pub fn get<'a>(doc: &'a Value, pointer: &str) -> Result<&'a Value, PointerError> {
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(PointerError::Invalid(pointer.to_string()));
    }
    doc.pointer(pointer)
        .ok_or_else(|| PointerError::Missing(pointer.to_string()))
}

pub fn get_str<'a>(doc: &'a Value, pointer: &str) -> Result<&'a str, PointerError> {
    get(doc, pointer)?
        .as_str()
        .ok_or_else(|| PointerError::WrongType {
            pointer: pointer.to_string(),
            expected: "a string",
        })
}

/// String at `pointer`, or `""` when absent or not a string.
pub fn str_or_default(doc: &Value, pointer: &str) -> String {
    get_str(doc, pointer).unwrap_or_default().to_string()
}

/// Integer encoded as a string at `pointer` (the platform sends option values
/// and button values as strings), or `0` when absent or unparsable.
pub fn int_or_default(doc: &Value, pointer: &str) -> i64 {
    get_str(doc, pointer)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}

/// Replaces or inserts the value at `pointer`. The parent must already exist.
pub fn set(doc: &mut Value, pointer: &str, value: Value) -> Result<(), PointerError> {
    if pointer.is_empty() {
        *doc = value;
        return Ok(());
    }
    let Some((parent, token)) = pointer.rsplit_once('/') else {
        return Err(PointerError::Invalid(pointer.to_string()));
    };
    let token = unescape(token);
    let target = doc
        .pointer_mut(parent)
        .ok_or_else(|| PointerError::Missing(parent.to_string()))?;

    match target {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(items) => {
            if token == "-" {
                items.push(value);
                return Ok(());
            }
            let slot = token
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get_mut(index))
                .ok_or_else(|| PointerError::Missing(pointer.to_string()))?;
            *slot = value;
            Ok(())
        }
        _ => Err(PointerError::WrongType {
            pointer: parent.to_string(),
            expected: "an object or array",
        }),
    }
}

fn unescape(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}
