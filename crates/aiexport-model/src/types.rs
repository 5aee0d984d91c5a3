// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SchemaError, SchemaResult};
use crate::normalize::{
    hidden_info_fields, normalize_files, normalize_hidden_messages, normalize_images,
    normalize_search_queries, normalize_search_results, normalize_segments,
};
use crate::schema::{
    assert_allowed_keys, assert_nullable_string, assert_object, assert_string, field_path, Object,
};

// ─── Attachment and annotation types ──────────────────────────────────────────

/// A downloaded image, already stored under the conversation's subdirectory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub filename: String,
    /// Display-only name the vendor gave the image.
    pub original_name: Option<String>,
}

/// A non-image attachment.  A `_v<N>_` fragment in `filename` marks a version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub filename: String,
    pub original_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub domain: Option<String>,
}

/// A collapsible annotation: system prompt, reasoning, tool call, sources…
///
/// `depth` is kept exactly as supplied; flooring and clamping happen at
/// render time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenMessageInfo {
    pub category: String,
    pub title: Option<String>,
    pub depth: Option<f64>,
    pub content: String,
}

/// One ordered piece of an assistant body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Text { content: String },
    Hidden(HiddenMessageInfo),
}

// ─── Message kinds ────────────────────────────────────────────────────────────

/// Discriminant written as `kind` when a message is serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    User,
    Assistant,
    Hidden,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by user and assistant turns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    content: String,
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<ImageInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<Vec<FileInfo>>,
    image_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_queries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_results: Option<Vec<SearchResult>>,
}

impl Turn {
    const KEYS: &'static [&'static str] = &[
        "content",
        "timestamp",
        "images",
        "files",
        "imageTitle",
        "searchQueries",
        "searchResults",
    ];

    fn from_fields(object: &Object, context: &str) -> SchemaResult<Self> {
        let content = assert_string(object.get("content"), &field_path(context, "content"))?;
        let timestamp =
            assert_nullable_string(object.get("timestamp"), &field_path(context, "timestamp"))?;
        let image_title =
            assert_nullable_string(object.get("imageTitle"), &field_path(context, "imageTitle"))?;
        Ok(Self {
            content,
            timestamp,
            images: normalize_images(object.get("images"), &field_path(context, "images"))?,
            files: normalize_files(object.get("files"), &field_path(context, "files"))?,
            image_title,
            search_queries: normalize_search_queries(
                object.get("searchQueries"),
                &field_path(context, "searchQueries"),
            )?,
            search_results: normalize_search_results(
                object.get("searchResults"),
                &field_path(context, "searchResults"),
            )?,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn images(&self) -> Option<&[ImageInfo]> {
        self.images.as_deref()
    }

    pub fn files(&self) -> Option<&[FileInfo]> {
        self.files.as_deref()
    }

    pub fn image_title(&self) -> Option<&str> {
        self.image_title.as_deref()
    }

    pub fn search_queries(&self) -> Option<&[String]> {
        self.search_queries.as_deref()
    }

    pub fn search_results(&self) -> Option<&[SearchResult]> {
        self.search_results.as_deref()
    }
}

/// Check `input` is an object whose keys all appear in `allowed`.
fn closed_input<'a>(input: &'a Value, allowed: &[&str], context: &str) -> SchemaResult<&'a Object> {
    let object = assert_object(input, context)?;
    assert_allowed_keys(object, allowed, context)?;
    Ok(object)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserMessage {
    #[serde(flatten)]
    turn: Turn,
}

impl UserMessage {
    /// Keys a user message input may carry.
    pub const KEYS: &'static [&'static str] = Turn::KEYS;

    /// Validate and copy a user message input.
    pub fn from_value(input: &Value, context: &str) -> SchemaResult<Self> {
        let object = closed_input(input, Self::KEYS, context)?;
        Self::from_fields(object, context)
    }

    pub(crate) fn from_fields(object: &Object, context: &str) -> SchemaResult<Self> {
        Ok(Self {
            turn: Turn::from_fields(object, context)?,
        })
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantMessage {
    #[serde(flatten)]
    turn: Turn,
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hidden_messages: Option<Vec<HiddenMessageInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<Segment>>,
}

impl AssistantMessage {
    pub const KEYS: &'static [&'static str] = &[
        "content",
        "timestamp",
        "images",
        "files",
        "imageTitle",
        "searchQueries",
        "searchResults",
        "model",
        "hiddenMessages",
        "segments",
    ];

    /// Validate and copy an assistant message input.
    ///
    /// `hiddenMessages` and `segments` are normalized independently; when
    /// both are present the renderer uses `segments` alone.
    pub fn from_value(input: &Value, context: &str) -> SchemaResult<Self> {
        let object = closed_input(input, Self::KEYS, context)?;
        Self::from_fields(object, context)
    }

    pub(crate) fn from_fields(object: &Object, context: &str) -> SchemaResult<Self> {
        let turn = Turn::from_fields(object, context)?;
        let model = assert_nullable_string(object.get("model"), &field_path(context, "model"))?;
        Ok(Self {
            turn,
            model,
            hidden_messages: normalize_hidden_messages(
                object.get("hiddenMessages"),
                &field_path(context, "hiddenMessages"),
            )?,
            segments: normalize_segments(object.get("segments"), &field_path(context, "segments"))?,
        })
    }

    pub fn turn(&self) -> &Turn {
        &self.turn
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn hidden_messages(&self) -> Option<&[HiddenMessageInfo]> {
        self.hidden_messages.as_deref()
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        self.segments.as_deref()
    }
}

/// A top-level annotation between turns.  Not a turn itself: it has no
/// timestamp and no attachments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HiddenMessage {
    #[serde(flatten)]
    info: HiddenMessageInfo,
}

impl HiddenMessage {
    pub const KEYS: &'static [&'static str] = &["category", "title", "depth", "content"];

    pub fn from_value(input: &Value, context: &str) -> SchemaResult<Self> {
        let object = closed_input(input, Self::KEYS, context)?;
        Self::from_fields(object, context)
    }

    pub(crate) fn from_fields(object: &Object, context: &str) -> SchemaResult<Self> {
        Ok(Self {
            info: hidden_info_fields(object, context)?,
        })
    }

    pub fn category(&self) -> &str {
        &self.info.category
    }

    pub fn title(&self) -> Option<&str> {
        self.info.title.as_deref()
    }

    pub fn depth(&self) -> Option<f64> {
        self.info.depth
    }

    pub fn content(&self) -> &str {
        &self.info.content
    }

    pub fn info(&self) -> &HiddenMessageInfo {
        &self.info
    }
}

/// A single entry of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    User(UserMessage),
    Assistant(AssistantMessage),
    Hidden(HiddenMessage),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::User(_) => MessageKind::User,
            Message::Assistant(_) => MessageKind::Assistant,
            Message::Hidden(_) => MessageKind::Hidden,
        }
    }

    /// Shared turn fields; `None` for hidden messages.
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            Message::User(m) => Some(m.turn()),
            Message::Assistant(m) => Some(m.turn()),
            Message::Hidden(_) => None,
        }
    }
}

// ─── Conversation ─────────────────────────────────────────────────────────────

/// A validated, read-only conversation document.
///
/// Only [`crate::ConversationBuilder::build`] and deserialization produce
/// one, and both run the whole-document validator first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "serde_json::Value")]
pub struct Conversation {
    title: String,
    service: String,
    created_at: Option<String>,
    exported_at: String,
    basename: String,
    messages: Vec<Message>,
}

impl Conversation {
    pub(crate) fn from_parts(
        title: String,
        service: String,
        created_at: Option<String>,
        exported_at: String,
        basename: String,
        messages: Vec<Message>,
    ) -> Self {
        Self {
            title,
            service,
            created_at,
            exported_at,
            basename,
            messages,
        }
    }

    /// Parse and validate a conversation from JSON text.
    pub fn from_json_str(text: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| SchemaError::Serialization {
            context: "Conversation".to_string(),
            message: e.to_string(),
        })?;
        crate::validate::conversation_from_value(&value)
    }

    /// Re-run the whole-document validator against this value as it would
    /// appear on the wire.
    pub fn validate(&self) -> SchemaResult<()> {
        let value = serde_json::to_value(self).map_err(|e| SchemaError::Serialization {
            context: "Conversation".to_string(),
            message: e.to_string(),
        })?;
        crate::validate::assert_valid_conversation(&value)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn exported_at(&self) -> &str {
        &self.exported_at
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl TryFrom<Value> for Conversation {
    type Error = SchemaError;

    fn try_from(value: Value) -> SchemaResult<Self> {
        crate::validate::conversation_from_value(&value)
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
