// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use aiexport_config::RenderConfig;
use serde::Deserialize;

use crate::hidden::resolve_hidden_message_depth;

fn default_depth() -> f64 {
    1.0
}

/// Options recognised by [`crate::to_markdown`].
///
/// Deserializing ignores unknown keys, so an options object shared with
/// other tooling can be passed through unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub show_timestamp: bool,
    pub show_hidden_messages: bool,
    /// Fallback nesting for hidden blocks without their own depth.
    #[serde(default = "default_depth")]
    pub hidden_message_depth: f64,
    pub show_model_name: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_timestamp: false,
            show_hidden_messages: false,
            hidden_message_depth: default_depth(),
            show_model_name: false,
        }
    }
}

impl RenderOptions {
    /// The option-level depth, floored and clamped to at least 1.
    pub fn effective_hidden_depth(&self) -> usize {
        resolve_hidden_message_depth(Some(self.hidden_message_depth), 1)
    }
}

impl From<&RenderConfig> for RenderOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            show_timestamp: config.show_timestamp,
            show_hidden_messages: config.show_hidden_messages,
            hidden_message_depth: config.hidden_message_depth as f64,
            show_model_name: config.show_model_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off_with_depth_one() {
        let o = RenderOptions::default();
        assert!(!o.show_timestamp && !o.show_hidden_messages && !o.show_model_name);
        assert_eq!(o.effective_hidden_depth(), 1);
    }

    #[test]
    fn deserialize_ignores_unknown_keys() {
        let o: RenderOptions = serde_json::from_value(serde_json::json!({
            "showHiddenMessages": true,
            "hiddenMessageDepth": 2.7,
            "downloadImages": true
        }))
        .unwrap();
        assert!(o.show_hidden_messages);
        assert!(!o.show_timestamp);
        assert_eq!(o.effective_hidden_depth(), 2);
    }

    #[test]
    fn depth_option_is_clamped() {
        let o = RenderOptions { hidden_message_depth: -4.0, ..Default::default() };
        assert_eq!(o.effective_hidden_depth(), 1);
        let o = RenderOptions { hidden_message_depth: f64::NAN, ..Default::default() };
        assert_eq!(o.effective_hidden_depth(), 1);
    }

    #[test]
    fn converts_from_config() {
        let cfg = RenderConfig {
            show_model_name: true,
            hidden_message_depth: 3,
            ..Default::default()
        };
        let o = RenderOptions::from(&cfg);
        assert!(o.show_model_name);
        assert_eq!(o.effective_hidden_depth(), 3);
    }
}
