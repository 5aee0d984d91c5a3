// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Conversation → markdown.
//!
//! Output layout, top to bottom:
//!
//! ```text
//! # <title>
//!
//! **<Service>** | *Created: … | Exported: … | Includes hidden messages*
//!
//! ---
//!
//! 🧑 **User** · <timestamp>
//!
//! <body>
//!
//! 🤖 **Assistant** · <timestamp> · *<model>*
//!
//! <body>
//! ```
//!
//! Emoji markers, the blockquote layout of hidden messages and the blank
//! line inserted before GFM tables are part of the output contract.

use std::sync::OnceLock;

use aiexport_model::{
    AssistantMessage, Conversation, FileInfo, HiddenMessageInfo, Message, SchemaResult, Segment,
    Turn,
};
use regex::Regex;
use tracing::{debug, trace};

use crate::hidden::{render_hidden_message, resolve_hidden_message_depth};
use crate::options::RenderOptions;
use crate::timestamp::format_timestamp;

fn file_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_v(\d+)_").expect("file version pattern is valid"))
}

/// A non-blank line, a newline, then a `|…|` header row directly followed by
/// a `|---|` separator row.
fn table_after_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([^\n])\n(\|[^\n]*\|[ \t]*\n\|[ \t:|-]*-[ \t:|-]*\|)")
            .expect("table pattern is valid")
    })
}

/// Render a conversation.  The document is validated again first; any
/// conversation that fails validation produces no output.
pub fn to_markdown(conversation: &Conversation, options: &RenderOptions) -> SchemaResult<String> {
    conversation.validate()?;
    debug!(messages = conversation.messages().len(), "rendering conversation");

    let depth = options.effective_hidden_depth();
    let mut md = String::new();

    let title = match conversation.title() {
        "" => "untitled",
        t => t,
    };
    md.push_str(&format!("# {title}\n\n"));

    if let Some(meta) = meta_line(conversation, options) {
        md.push_str(&meta);
        md.push_str("\n\n");
    }

    for (index, message) in conversation.messages().iter().enumerate() {
        trace!(index, kind = %message.kind(), "rendering message");
        match message {
            Message::Hidden(hidden) => {
                if options.show_hidden_messages {
                    md.push_str(&render_info(hidden.info(), depth));
                }
            }
            Message::User(user) => {
                md.push_str("---\n\n");
                push_header(&mut md, "🧑 **User**", user.turn(), None, options);
                push_turn_extras(&mut md, user.turn(), conversation.basename(), options, depth);
                if !user.turn().content().is_empty() {
                    md.push_str(user.turn().content());
                    md.push('\n');
                }
                md.push('\n');
            }
            Message::Assistant(assistant) => {
                push_header(
                    &mut md,
                    "🤖 **Assistant**",
                    assistant.turn(),
                    assistant.model(),
                    options,
                );
                push_turn_extras(
                    &mut md,
                    assistant.turn(),
                    conversation.basename(),
                    options,
                    depth,
                );
                push_assistant_body(&mut md, assistant, options, depth);
                md.push('\n');
            }
        }
    }

    let md = fix_table_spacing(&md);
    debug!(bytes = md.len(), "conversation rendered");
    Ok(md)
}

/// Insert a blank line between a paragraph and a GFM table that follows it
/// on the very next line.
pub fn fix_table_spacing(markdown: &str) -> String {
    table_after_text_re()
        .replace_all(markdown, "${1}\n\n${2}")
        .into_owned()
}

fn service_label(service: &str) -> Option<String> {
    if service.is_empty() {
        return None;
    }
    if service == "chatgpt" {
        return Some("ChatGPT".to_string());
    }
    let mut chars = service.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
}

fn meta_line(conversation: &Conversation, options: &RenderOptions) -> Option<String> {
    let label = service_label(conversation.service());

    let mut parts = Vec::new();
    if options.show_timestamp {
        if let Some(created) = conversation.created_at() {
            parts.push(format!("Created: {}", format_timestamp(created)));
        }
        parts.push(format!("Exported: {}", format_timestamp(conversation.exported_at())));
    }
    if options.show_hidden_messages {
        parts.push("Includes hidden messages".to_string());
    }

    if label.is_none() && parts.is_empty() {
        return None;
    }

    let mut line = label.map(|l| format!("**{l}**")).unwrap_or_default();
    if !parts.is_empty() {
        if !line.is_empty() {
            line.push_str(" | ");
        }
        line.push_str(&format!("*{}*", parts.join(" | ")));
    }
    Some(line)
}

fn push_header(
    md: &mut String,
    label: &str,
    turn: &Turn,
    model: Option<&str>,
    options: &RenderOptions,
) {
    md.push_str(label);
    if options.show_timestamp {
        if let Some(ts) = turn.timestamp() {
            md.push_str(&format!(" · {}", format_timestamp(ts)));
        }
    }
    if options.show_model_name {
        if let Some(model) = model.filter(|m| !m.is_empty()) {
            md.push_str(&format!(" · *{model}*"));
        }
    }
    md.push_str("\n\n");
}

fn render_info(info: &HiddenMessageInfo, fallback_depth: usize) -> String {
    render_hidden_message(
        Some(&info.category),
        info.title.as_deref(),
        &info.content,
        resolve_hidden_message_depth(info.depth, fallback_depth),
    )
}

fn attachment_path(basename: &str, filename: &str) -> String {
    if basename.is_empty() {
        filename.to_string()
    } else {
        format!("{basename}/{filename}")
    }
}

fn file_display_name(file: &FileInfo) -> String {
    match file.original_name.as_deref() {
        Some(original) => match file_version_re().captures(&file.filename) {
            Some(caps) => format!("{original} (v{})", &caps[1]),
            None => original.to_string(),
        },
        None => file.filename.clone(),
    }
}

/// Search blocks, image title, images and files: everything between the
/// header and the body.
fn push_turn_extras(
    md: &mut String,
    turn: &Turn,
    basename: &str,
    options: &RenderOptions,
    depth: usize,
) {
    if options.show_hidden_messages {
        if let Some(queries) = turn.search_queries() {
            md.push_str(&render_hidden_message(Some("Search"), None, &queries.join(", "), depth));
        }
        if let Some(results) = turn.search_results() {
            let lines: Vec<String> = results
                .iter()
                .filter(|r| !r.url.is_empty() && !r.title.is_empty())
                .map(|r| match r.domain.as_deref().filter(|d| !d.is_empty()) {
                    Some(domain) => format!("[{}]({}) · {domain}", r.title, r.url),
                    None => format!("[{}]({})", r.title, r.url),
                })
                .collect();
            if !lines.is_empty() {
                md.push_str(&render_hidden_message(
                    Some("Sources"),
                    None,
                    &lines.join("\n"),
                    depth,
                ));
            }
        }
    }

    if let Some(title) = turn.image_title().filter(|t| !t.is_empty()) {
        md.push_str(&format!("🖼️ *Image: {title}*\n\n"));
    }

    for image in turn.images().unwrap_or_default() {
        md.push_str(&format!(
            "<img src=\"{}\" alt=\"image\" width=\"360\" />\n\n",
            attachment_path(basename, &image.filename)
        ));
    }

    for file in turn.files().unwrap_or_default() {
        md.push_str(&format!(
            "📄 [{}]({})\n\n",
            file_display_name(file),
            attachment_path(basename, &file.filename)
        ));
    }
}

fn push_assistant_body(
    md: &mut String,
    assistant: &AssistantMessage,
    options: &RenderOptions,
    depth: usize,
) {
    // Segments, when present, replace content + hiddenMessages entirely.
    if let Some(segments) = assistant.segments() {
        for segment in segments {
            match segment {
                Segment::Text { content } => {
                    if !content.is_empty() {
                        md.push_str(content);
                        md.push_str("\n\n");
                    }
                }
                Segment::Hidden(info) => {
                    if options.show_hidden_messages {
                        md.push_str(&render_info(info, depth));
                    }
                }
            }
        }
        return;
    }

    if options.show_hidden_messages {
        for info in assistant.hidden_messages().unwrap_or_default() {
            md.push_str(&render_info(info, depth));
        }
    }
    md.push_str(assistant.turn().content());
    md.push('\n');
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
