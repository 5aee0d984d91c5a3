// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The only sanctioned way for a vendor adapter to assemble a conversation.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaResult;
use crate::schema::{
    assert_allowed_keys, assert_nullable_string, assert_object, assert_string, field_path,
    index_path,
};
use crate::types::{AssistantMessage, Conversation, HiddenMessage, Message, UserMessage};

const INIT_CONTEXT: &str = "ConversationInit";

/// Collects validated messages for one document.
///
/// Every `add_*` call validates its input before anything is appended, so a
/// failed call leaves the builder unchanged.  [`build`](Self::build) consumes
/// the builder; start a new one for the next document.
#[derive(Debug)]
pub struct ConversationBuilder {
    title: String,
    service: String,
    basename: String,
    created_at: Option<String>,
    messages: Vec<Message>,
}

impl ConversationBuilder {
    /// Keys accepted by [`ConversationBuilder::new`].
    pub const INIT_KEYS: &'static [&'static str] = &["title", "service", "basename", "createdAt"];

    /// Open a builder from `{ title, service, basename, createdAt? }`.
    pub fn new(init: &Value) -> SchemaResult<Self> {
        let object = assert_object(init, INIT_CONTEXT)?;
        assert_allowed_keys(object, Self::INIT_KEYS, INIT_CONTEXT)?;
        let builder = Self {
            title: assert_string(object.get("title"), &field_path(INIT_CONTEXT, "title"))?,
            service: assert_string(object.get("service"), &field_path(INIT_CONTEXT, "service"))?,
            basename: assert_string(object.get("basename"), &field_path(INIT_CONTEXT, "basename"))?,
            created_at: assert_nullable_string(
                object.get("createdAt"),
                &field_path(INIT_CONTEXT, "createdAt"),
            )?,
            messages: Vec::new(),
        };
        debug!(
            service = %builder.service,
            basename = %builder.basename,
            "conversation builder opened"
        );
        Ok(builder)
    }

    fn next_context(&self) -> String {
        index_path("Message", self.messages.len())
    }

    fn push(&mut self, message: Message) -> &mut Self {
        debug!(kind = %message.kind(), index = self.messages.len(), "message added");
        self.messages.push(message);
        self
    }

    pub fn add_user_message(&mut self, input: &Value) -> SchemaResult<&mut Self> {
        let message = UserMessage::from_value(input, &self.next_context())?;
        Ok(self.push(Message::User(message)))
    }

    pub fn add_assistant_message(&mut self, input: &Value) -> SchemaResult<&mut Self> {
        let message = AssistantMessage::from_value(input, &self.next_context())?;
        Ok(self.push(Message::Assistant(message)))
    }

    pub fn add_hidden_message(&mut self, input: &Value) -> SchemaResult<&mut Self> {
        let message = HiddenMessage::from_value(input, &self.next_context())?;
        Ok(self.push(Message::Hidden(message)))
    }

    /// Number of messages appended so far.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Stamp `exportedAt` with the current time and return the validated
    /// conversation.
    pub fn build(self) -> SchemaResult<Conversation> {
        self.build_at(Utc::now())
    }

    /// Like [`build`](Self::build) with an explicit export time.
    pub fn build_at(self, exported_at: DateTime<Utc>) -> SchemaResult<Conversation> {
        let count = self.messages.len();
        let conversation = Conversation::from_parts(
            self.title,
            self.service,
            self.created_at,
            exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.basename,
            self.messages,
        );
        conversation.validate()?;
        debug!(messages = count, exported_at = %conversation.exported_at(), "conversation built");
        Ok(conversation)
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
