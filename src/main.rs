// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod cli;

use std::collections::BTreeMap;
use std::io::{self, Read, Write};
use std::path::Path;

use aiexport_model::Conversation;
use aiexport_render::{to_markdown, RenderOptions};
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match &cli.command {
        Commands::Completions { shell } => {
            cli::print_completions(*shell);
            Ok(())
        }
        Commands::ShowConfig => {
            let config = aiexport_config::load(cli.config.as_deref())?;
            let text = toml::to_string(&config).context("serializing configuration")?;
            print!("{text}");
            Ok(())
        }
        Commands::Validate { input } => validate_conversation(input),
        Commands::Render { input, output, flags } => {
            let config = aiexport_config::load(cli.config.as_deref())?;
            let mut options = RenderOptions::from(&config.render);
            flags.apply(&mut options);
            debug!(?options, "effective render options");
            render_conversation(input, output.as_deref(), &options)
        }
    }
}

/// Read conversation JSON from a file, or stdin when the path is `-`,
/// and validate it.
fn read_conversation(input: &Path) -> anyhow::Result<Conversation> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("reading conversation from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading conversation file {}", input.display()))?
    };
    let conversation = Conversation::from_json_str(&text)?;
    debug!(
        title = %conversation.title(),
        messages = conversation.messages().len(),
        "conversation loaded"
    );
    Ok(conversation)
}

/// Validate a conversation file and print a short summary to stdout.
fn validate_conversation(input: &Path) -> anyhow::Result<()> {
    let conversation = read_conversation(input)?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for message in conversation.messages() {
        *counts.entry(message.kind().as_str()).or_default() += 1;
    }

    println!("Title: {}", conversation.title());
    println!("Service: {}", conversation.service());
    println!("Basename: {}", conversation.basename());
    println!("Exported: {}", conversation.exported_at());
    println!("Messages: {}", conversation.messages().len());
    for (kind, count) in &counts {
        println!("  {kind}: {count}");
    }
    println!("\nConversation is valid.");
    Ok(())
}

fn render_conversation(
    input: &Path,
    output: Option<&Path>,
    options: &RenderOptions,
) -> anyhow::Result<()> {
    let conversation = read_conversation(input)?;
    let markdown = to_markdown(&conversation, options)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating directory {}", parent.display()))?;
            }
            std::fs::write(path, &markdown)
                .with_context(|| format!("writing markdown to {}", path.display()))?;
            info!(path = %path.display(), bytes = markdown.len(), "markdown written");
        }
        None => {
            io::stdout()
                .write_all(markdown.as_bytes())
                .context("writing markdown to stdout")?;
        }
    }
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
