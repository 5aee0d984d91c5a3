/// End-to-end tests: builder → JSON → validator → renderer, and the
/// `aiexport` binary driven through its command line.
use std::process::Command;

use aiexport_model::{Conversation, ConversationBuilder, SchemaError};
use aiexport_render::{
    render_hidden_message, resolve_hidden_message_depth, to_markdown, RenderOptions,
    MAX_HIDDEN_MESSAGE_DEPTH,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn sample() -> Conversation {
    let mut b = ConversationBuilder::new(&json!({
        "title": "T",
        "service": "chatgpt",
        "basename": "t",
        "createdAt": "2026-02-03T04:05:06Z"
    }))
    .unwrap();
    b.add_hidden_message(&json!({
        "category": "System",
        "title": "prompt",
        "content": "Be brief."
    }))
    .unwrap();
    b.add_user_message(&json!({
        "content": "hi",
        "timestamp": "2026-02-03T04:05:07Z",
        "files": [{ "filename": "spec_v2_x.pdf", "originalName": "spec.pdf" }]
    }))
    .unwrap();
    b.add_assistant_message(&json!({
        "content": "hello",
        "model": "gpt-4o",
        "hiddenMessages": [{ "category": "Thinking", "content": "greet back" }]
    }))
    .unwrap();
    b.build_at(Utc.with_ymd_and_hms(2026, 2, 3, 5, 0, 0).unwrap()).unwrap()
}

// ── Library pipeline ─────────────────────────────────────────────────────────

#[test]
fn default_render_matches_canonical_layout() {
    let init = json!({ "title": "T", "service": "chatgpt", "basename": "t" });
    let mut b = ConversationBuilder::new(&init).unwrap();
    b.add_user_message(&json!({ "content": "hi" })).unwrap();
    b.add_assistant_message(&json!({ "content": "hello" })).unwrap();
    let md = to_markdown(&b.build().unwrap(), &RenderOptions::default()).unwrap();
    assert!(md.starts_with(
        "# T\n\n**ChatGPT**\n\n---\n\n🧑 **User**\n\nhi\n\n🤖 **Assistant**\n\nhello\n\n"
    ));
}

#[test]
fn full_options_render() {
    let options = RenderOptions {
        show_timestamp: true,
        show_hidden_messages: true,
        hidden_message_depth: 1.0,
        show_model_name: true,
    };
    let md = to_markdown(&sample(), &options).unwrap();
    let expected = "# T\n\n\
        **ChatGPT** | *Created: 2026-02-03 04:05:06 UTC | \
        Exported: 2026-02-03 05:00:00 UTC | Includes hidden messages*\n\n\
        > **System** prompt\n>\n> Be brief.\n\n\
        ---\n\n\
        🧑 **User** · 2026-02-03 04:05:07 UTC\n\n\
        📄 [spec.pdf (v2)](t/spec_v2_x.pdf)\n\n\
        hi\n\n\
        🤖 **Assistant** · *gpt-4o*\n\n\
        > **Thinking**\n>\n> greet back\n\n\
        hello\n\n";
    assert_eq!(md, expected);
}

#[test]
fn json_boundary_round_trip_renders_identically() {
    let conv = sample();
    let json = serde_json::to_string_pretty(&conv).unwrap();
    let back = Conversation::from_json_str(&json).unwrap();
    let options = RenderOptions { show_hidden_messages: true, ..Default::default() };
    assert_eq!(to_markdown(&conv, &options).unwrap(), to_markdown(&back, &options).unwrap());
}

#[test]
fn tampered_json_is_rejected_before_render() {
    let mut value = serde_json::to_value(sample()).unwrap();
    value["messages"][1]["vendorId"] = json!("abc");
    let err = serde_json::from_value::<Conversation>(value).unwrap_err();
    assert!(err.to_string().contains("Unexpected field \"vendorId\" in Message[1]"), "{err}");
}

#[test]
fn unexpected_field_error_message_format() {
    let mut b = ConversationBuilder::new(&json!({ "title": "T", "service": "s", "basename": "b" }))
        .unwrap();
    b.add_user_message(&json!({ "content": "ok" })).unwrap();
    b.add_user_message(&json!({ "content": "ok" })).unwrap();
    let err = b.add_user_message(&json!({ "content": "x", "role": "user" })).unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnexpectedField { key: "role".into(), context: "Message[2]".into() }
    );
    assert!(err.to_string().starts_with("[AIExport] "));
}

#[test]
fn huge_hidden_depth_renders_without_panicking() {
    let mut b = ConversationBuilder::new(&json!({ "title": "T", "service": "s", "basename": "b" }))
        .unwrap();
    b.add_hidden_message(&json!({ "category": "c", "content": "x", "depth": 1e20 }))
        .unwrap();
    let conv = b.build().unwrap();
    let options = RenderOptions {
        show_hidden_messages: true,
        hidden_message_depth: 1e20,
        ..Default::default()
    };
    let md = to_markdown(&conv, &options).unwrap();
    let capped = ">".repeat(MAX_HIDDEN_MESSAGE_DEPTH);
    assert!(md.ends_with(&format!("{capped} *c*\n{capped}\n{capped} x\n\n")), "{md}");
}

#[test]
fn hidden_helpers_are_public() {
    assert_eq!(resolve_hidden_message_depth(Some(2.9), 1), 2);
    assert_eq!(
        render_hidden_message(Some("Thinking"), None, "line1\nline2", 1),
        "> **Thinking**\n>\n> line1\n> line2\n\n"
    );
}

// ── Command line ─────────────────────────────────────────────────────────────

fn write_sample(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("conv.json");
    std::fs::write(&path, serde_json::to_string(&sample()).unwrap()).unwrap();
    path
}

fn aiexport() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aiexport"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_render_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let output = dir.path().join("out/nested/conv.md");

    let status = aiexport()
        .current_dir(dir.path())
        .args(["render", input.to_str().unwrap(), "--show-hidden", "-o"])
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let md = std::fs::read_to_string(&output).unwrap();
    assert!(md.starts_with("# T\n\n**ChatGPT** | *Includes hidden messages*\n\n"));
    assert!(md.contains("> **System** prompt"));
}

#[test]
fn cli_render_uses_explicit_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let config = dir.path().join("cfg.toml");
    std::fs::write(&config, "[render]\nshow_model_name = true\n").unwrap();

    let out = aiexport()
        .current_dir(dir.path())
        .args(["render", input.to_str().unwrap(), "-c", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let md = String::from_utf8(out.stdout).unwrap();
    assert!(md.contains("🤖 **Assistant** · *gpt-4o*"));
    assert!(!md.contains("System"));
}

#[test]
fn cli_validate_reports_first_error() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(
        &bad,
        r#"{"title":"T","service":"s","basename":"b","exportedAt":"x","createdAt":null,
            "messages":[{"kind":"user","content":"hi","images":null}]}"#,
    )
    .unwrap();

    let out = aiexport()
        .current_dir(dir.path())
        .args(["validate", bad.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("[AIExport] Expected array for Message[0].images"), "{stderr}");
}

#[test]
fn cli_validate_prints_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_sample(dir.path());
    let out = aiexport()
        .current_dir(dir.path())
        .args(["validate", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Messages: 3"));
    assert!(stdout.contains("  hidden: 1"));
    assert!(stdout.contains("Conversation is valid."));
}
