// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Primitive shape checks shared by every constructor and validator.
//!
//! Each assertion takes the value under test plus a context path and either
//! returns the checked value or a [`SchemaError`] naming that path.  Nothing
//! here coerces: a number is never accepted where a string is expected.  A
//! missing optional field is read as `null`, which is the only substitution
//! performed.

use serde_json::{Map, Value};

use crate::error::{SchemaError, SchemaResult};

pub type Object = Map<String, Value>;

/// Join a parent context and a field name into a dotted path.
pub(crate) fn field_path(context: &str, name: &str) -> String {
    format!("{context}.{name}")
}

/// Join a parent context and an array position into an indexed path.
pub(crate) fn index_path(context: &str, index: usize) -> String {
    format!("{context}[{index}]")
}

/// The value must be a JSON object.
pub fn assert_object<'a>(value: &'a Value, context: &str) -> SchemaResult<&'a Object> {
    value.as_object().ok_or_else(|| SchemaError::TypeMismatch {
        expected: "object",
        context: context.to_string(),
    })
}

/// Reject the first key of `object` that is not in `allowed`.
pub fn assert_allowed_keys(object: &Object, allowed: &[&str], context: &str) -> SchemaResult<()> {
    match object.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(SchemaError::UnexpectedField {
            key: key.clone(),
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

/// A required string.  A missing field counts as a type mismatch.
pub fn assert_string(value: Option<&Value>, context: &str) -> SchemaResult<String> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(SchemaError::TypeMismatch {
            expected: "string",
            context: context.to_string(),
        }),
    }
}

/// A string or `null`; a missing field reads as `null`.
pub fn assert_nullable_string(
    value: Option<&Value>,
    context: &str,
) -> SchemaResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::TypeMismatch {
            expected: "string or null",
            context: context.to_string(),
        }),
    }
}

/// A number or `null`; a missing field reads as `null`.
pub fn assert_nullable_number(value: Option<&Value>, context: &str) -> SchemaResult<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| SchemaError::TypeMismatch {
            expected: "number or null",
            context: context.to_string(),
        }),
        Some(_) => Err(SchemaError::TypeMismatch {
            expected: "number or null",
            context: context.to_string(),
        }),
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
