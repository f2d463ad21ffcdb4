//! Field validators for request messages
//!
//! Each validator inspects one submitted JSON value and returns the message
//! suffix on failure. The field label is prefixed by the rule engine.

use serde_json::Value;

/// Whether a value counts as blank: null, false, an empty or whitespace-only
/// string, an empty array or an empty object
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

/// Validate that a value is present (not blank)
pub fn validate_presence(value: &Value) -> Result<(), String> {
    if is_blank(value) {
        return Err("can't be blank".to_string());
    }
    Ok(())
}

/// Validate that a value is a JSON string
pub fn validate_string(value: &Value) -> Result<(), String> {
    if !value.is_string() {
        return Err("must be a string".to_string());
    }
    Ok(())
}

/// Validate string length does not exceed `max` characters
///
/// Non-string values are left to the string validator.
pub fn validate_max_length(value: &Value, max: usize) -> Result<(), String> {
    if let Value::String(s) = value {
        if s.chars().count() > max {
            return Err(format!("is too long (maximum is {} characters)", max));
        }
    }
    Ok(())
}

/// Validate that a value is a JSON array
pub fn validate_array(value: &Value) -> Result<(), String> {
    if !value.is_array() {
        return Err("must be an array".to_string());
    }
    Ok(())
}

/// Validate that an array holds at least `min` items, naming them `noun`
pub fn validate_min_array_length(value: &Value, min: usize, noun: &str) -> Result<(), String> {
    if let Value::Array(items) = value {
        if items.len() < min {
            return Err(format!("must have at least {} {}", min, noun));
        }
    }
    Ok(())
}

/// Validate an optional positive integer; null is accepted
pub fn validate_positive_integer(value: &Value) -> Result<(), String> {
    match value {
        Value::Null => Ok(()),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (_, Some(u)) if u > 0 => Ok(()),
            (Some(_), _) | (_, Some(_)) => Err("must be greater than 0".to_string()),
            _ => Err("must be an integer".to_string()),
        },
        _ => Err("must be an integer".to_string()),
    }
}
