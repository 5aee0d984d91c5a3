// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Canonical conversation document model.
//!
//! Vendor adapters feed plain JSON values into a [`ConversationBuilder`];
//! every value is checked against a closed key-set and copied into an
//! immutable [`Message`].  The resulting [`Conversation`] is the only input
//! the markdown renderer accepts.
mod builder;
mod error;
mod normalize;
mod schema;
mod types;
pub mod validate;

pub use builder::ConversationBuilder;
pub use error::{SchemaError, SchemaResult};
pub use normalize::{
    normalize_files, normalize_hidden_messages, normalize_images, normalize_search_queries,
    normalize_search_results, normalize_segments,
};
pub use schema::{
    assert_allowed_keys, assert_nullable_number, assert_nullable_string, assert_object,
    assert_string,
};
pub use types::{
    AssistantMessage, Conversation, FileInfo, HiddenMessage, HiddenMessageInfo, ImageInfo,
    Message, MessageKind, SearchResult, Segment, Turn, UserMessage,
};
pub use validate::{assert_valid_conversation, assert_valid_message};
