// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Block-quote rendering for hidden annotations.

/// Deepest blockquote nesting the renderer emits.  Deeper requests are
/// rendered at this depth.
pub const MAX_HIDDEN_MESSAGE_DEPTH: usize = 32;

/// Floor `value` and clamp it to `1..=MAX_HIDDEN_MESSAGE_DEPTH`; fall back
/// when it is absent or not finite.
pub fn resolve_hidden_message_depth(value: Option<f64>, fallback: usize) -> usize {
    let depth = match value {
        Some(v) if v.is_finite() => {
            let floored = v.floor();
            if floored < 1.0 {
                1
            } else if floored >= MAX_HIDDEN_MESSAGE_DEPTH as f64 {
                MAX_HIDDEN_MESSAGE_DEPTH
            } else {
                floored as usize
            }
        }
        _ => fallback,
    };
    depth.clamp(1, MAX_HIDDEN_MESSAGE_DEPTH)
}

/// Quote a hidden annotation `depth` levels deep.
///
/// The header is `**category**` at depth 1 and `*category*` deeper, with
/// the title appended (`· title` when nested under a category).  A bare `>`
/// line separates header from body.  Returns an empty string when there is
/// neither header nor content; otherwise the block ends with a blank line.
pub fn render_hidden_message(
    category: Option<&str>,
    title: Option<&str>,
    content: &str,
    depth: usize,
) -> String {
    let depth = depth.clamp(1, MAX_HIDDEN_MESSAGE_DEPTH);
    let prefix = ">".repeat(depth);
    let line_prefix = format!("{prefix} ");

    let category = category.filter(|c| !c.is_empty());
    let title = title.filter(|t| !t.is_empty());

    let mut header = String::new();
    if let Some(c) = category {
        if depth <= 1 {
            header.push_str(&format!("**{c}**"));
        } else {
            header.push_str(&format!("*{c}*"));
        }
    }
    if let Some(t) = title {
        if category.is_some() && depth >= 2 {
            header.push_str(" · ");
        } else if !header.is_empty() {
            header.push(' ');
        }
        header.push_str(t);
    }

    let normalized = content.replace("\r\n", "\n");
    let body: Vec<String> = if normalized.is_empty() {
        Vec::new()
    } else {
        normalized.split('\n').map(|line| format!("{line_prefix}{line}")).collect()
    };

    let mut lines = Vec::with_capacity(body.len() + 2);
    if !header.is_empty() {
        lines.push(format!("{line_prefix}{header}"));
        if !body.is_empty() {
            lines.push(prefix.clone());
        }
    }
    lines.extend(body);

    if lines.is_empty() {
        return String::new();
    }
    let mut out = lines.join("\n");
    out.push_str("\n\n");
    out
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
