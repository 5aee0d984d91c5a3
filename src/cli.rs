// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use aiexport_render::RenderOptions;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "aiexport",
    about = "Render exported AI chat transcripts as canonical markdown",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a conversation JSON document and render it as markdown.
    Render {
        /// Conversation JSON file, or "-" for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Write markdown to this path instead of stdout.
        /// Intermediate directories are created if needed.
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        flags: RenderFlags,
    },
    /// Validate a conversation JSON document without rendering it.
    /// Exits 0 if valid, non-zero with the first validation error otherwise.
    Validate {
        /// Conversation JSON file, or "-" for stdin
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Per-run overrides on top of the `[render]` config section.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderFlags {
    /// Show created/exported times and per-message timestamps
    #[arg(long)]
    pub show_timestamp: bool,
    /// Include hidden messages (system prompts, reasoning, tool calls, sources)
    #[arg(long)]
    pub show_hidden: bool,
    /// Blockquote depth for hidden messages that carry none of their own
    #[arg(long, value_name = "N")]
    pub hidden_depth: Option<i64>,
    /// Append the model name to assistant headers
    #[arg(long)]
    pub show_model: bool,
}

impl RenderFlags {
    /// Flags can only switch options on; the depth replaces the configured one.
    pub fn apply(&self, options: &mut RenderOptions) {
        options.show_timestamp |= self.show_timestamp;
        options.show_hidden_messages |= self.show_hidden;
        options.show_model_name |= self.show_model;
        if let Some(depth) = self.hidden_depth {
            options.hidden_message_depth = depth as f64;
        }
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "aiexport", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse_and_apply() {
        let cli = Cli::parse_from([
            "aiexport",
            "render",
            "conv.json",
            "--show-hidden",
            "--hidden-depth",
            "2",
            "-o",
            "out.md",
        ]);
        let Commands::Render { input, output, flags } = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(input, PathBuf::from("conv.json"));
        assert_eq!(output, Some(PathBuf::from("out.md")));

        let mut options = RenderOptions { show_model_name: true, ..Default::default() };
        flags.apply(&mut options);
        assert!(options.show_hidden_messages);
        assert!(options.show_model_name, "config value must survive an absent flag");
        assert!(!options.show_timestamp);
        assert_eq!(options.effective_hidden_depth(), 2);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["aiexport", "validate", "-", "-vv", "-c", "x.toml"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
