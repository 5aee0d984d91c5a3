// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

fn default_depth() -> i64 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
}

/// Defaults for the markdown renderer.  Command-line flags may switch any of
/// the boolean options on for a single run.
///
/// ```toml
/// [render]
/// show_timestamp = true
/// show_hidden_messages = true
/// hidden_message_depth = 2
/// show_model_name = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Add "Created"/"Exported" to the meta line and timestamps to headers.
    #[serde(default)]
    pub show_timestamp: bool,
    /// Render hidden messages (system prompts, reasoning, tool calls, search
    /// queries and sources) as block quotes.
    #[serde(default)]
    pub show_hidden_messages: bool,
    /// Blockquote nesting used for hidden blocks that carry no depth of their
    /// own.  Values below 1 are treated as 1.
    #[serde(default = "default_depth")]
    pub hidden_message_depth: i64,
    /// Append the model name to assistant headers.
    #[serde(default)]
    pub show_model_name: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_timestamp: false,
            show_hidden_messages: false,
            hidden_message_depth: default_depth(),
            show_model_name: false,
        }
    }
}
