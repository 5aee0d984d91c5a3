// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Whole-document validation for conversations that arrive as JSON.
//!
//! A serialized message is one of the three construction inputs plus a
//! `kind` discriminant.  Validation re-runs exactly the construction checks,
//! so a document that passes here converts into the same typed value the
//! builder would have produced.

use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::schema::{
    assert_allowed_keys, assert_nullable_string, assert_object, assert_string, field_path,
    index_path, Object,
};
use crate::types::{AssistantMessage, Conversation, HiddenMessage, Message, UserMessage};

const CONTEXT: &str = "Conversation";

/// Check `object` against a variant's construction keys plus `kind`.
fn assert_variant_keys(object: &Object, keys: &[&str], context: &str) -> SchemaResult<()> {
    let mut allowed = Vec::with_capacity(keys.len() + 1);
    allowed.push("kind");
    allowed.extend_from_slice(keys);
    assert_allowed_keys(object, &allowed, context)
}

/// Convert one serialized message, dispatching on its `kind`.
pub fn message_from_value(value: &Value, index: usize) -> SchemaResult<Message> {
    let context = index_path("Message", index);
    let object = assert_object(value, &context)?;
    match object.get("kind").and_then(Value::as_str) {
        Some("user") => {
            assert_variant_keys(object, UserMessage::KEYS, &context)?;
            UserMessage::from_fields(object, &context).map(Message::User)
        }
        Some("assistant") => {
            assert_variant_keys(object, AssistantMessage::KEYS, &context)?;
            AssistantMessage::from_fields(object, &context).map(Message::Assistant)
        }
        Some("hidden") => {
            assert_variant_keys(object, HiddenMessage::KEYS, &context)?;
            HiddenMessage::from_fields(object, &context).map(Message::Hidden)
        }
        _ => Err(SchemaError::InvalidVariant { context }),
    }
}

pub fn assert_valid_message(value: &Value, index: usize) -> SchemaResult<()> {
    message_from_value(value, index).map(|_| ())
}

/// Convert a serialized conversation, validating every field and message.
pub fn conversation_from_value(value: &Value) -> SchemaResult<Conversation> {
    let object = assert_object(value, CONTEXT)?;
    let title = assert_string(object.get("title"), &field_path(CONTEXT, "title"))?;
    let service = assert_string(object.get("service"), &field_path(CONTEXT, "service"))?;
    let basename = assert_string(object.get("basename"), &field_path(CONTEXT, "basename"))?;
    let exported_at = assert_string(object.get("exportedAt"), &field_path(CONTEXT, "exportedAt"))?;
    let created_at =
        assert_nullable_string(object.get("createdAt"), &field_path(CONTEXT, "createdAt"))?;

    let messages = match object.get("messages") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| message_from_value(item, i))
            .collect::<SchemaResult<Vec<_>>>()?,
        _ => {
            return Err(SchemaError::ExpectedArray {
                context: field_path(CONTEXT, "messages"),
            })
        }
    };

    Ok(Conversation::from_parts(
        title,
        service,
        created_at,
        exported_at,
        basename,
        messages,
    ))
}

pub fn assert_valid_conversation(value: &Value) -> SchemaResult<()> {
    conversation_from_value(value).map(|_| ())
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
