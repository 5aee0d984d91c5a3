// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Deterministic markdown rendering for validated conversations.
mod hidden;
mod markdown;
mod options;
mod timestamp;

pub use hidden::{
    render_hidden_message, resolve_hidden_message_depth, MAX_HIDDEN_MESSAGE_DEPTH,
};
pub use markdown::{fix_table_spacing, to_markdown};
pub use options::RenderOptions;
pub use timestamp::format_timestamp;
