//! Configuration system tests
//!
//! Tests configuration loading, validation, and environment overrides
//! through the binary

mod common;

use std::fs;

use predicates::prelude::*;

use common::Workspace;

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_default_config_is_valid() {
    Workspace::with_personas(&[])
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("does not exist").not());
}

#[test]
fn test_validate_notes_missing_personas_dir() {
    Workspace::empty()
        .cmd()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does not exist yet"));
}

#[test]
fn test_config_show_defaults() {
    Workspace::empty()
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[workspace]"))
        .stdout(predicate::str::contains("[personas]"))
        .stdout(predicate::str::contains("vscode/personas"))
        .stdout(predicate::str::contains(".github/copilot-instructions.md"))
        .stdout(predicate::str::contains("[logging]"));
}

#[test]
fn test_custom_layout_from_file() {
    let ws = Workspace::empty();
    ws.write_file("prompts/reviewer.md", "Review carefully.");
    let config = ws.write_file(
        "switcher.toml",
        r#"
[personas]
dir = "prompts"

[output]
instructions_file = "AGENTS.md"

[state]
persist_active = false
"#,
    );

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["select", "reviewer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Persona: Reviewer"));

    let published = fs::read_to_string(ws.root().join("AGENTS.md")).unwrap();
    assert!(published.contains("see the files in the 'prompts/' directory"));
    assert!(published.ends_with("\n\nReview carefully."));
    assert!(!ws.marker_file().exists());
}

#[test]
fn test_config_in_working_directory_is_found() {
    let ws = Workspace::empty();
    ws.write_file("personas/coder.md", "Write code.");
    ws.write_file("persona-switcher.toml", "[personas]\ndir = \"personas\"\n");

    ws.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coder"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_missing_explicit_config() {
    Workspace::empty()
        .cmd()
        .args(["--config", "nowhere.toml", "config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E100"))
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_invalid_log_level() {
    let ws = Workspace::empty();
    let config = ws.write_file("bad.toml", "[logging]\nlevel = \"loud\"\n");

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("Invalid log level"));
}

#[test]
fn test_output_inside_personas_dir_rejected() {
    let ws = Workspace::empty();
    let config = ws.write_file(
        "bad.toml",
        "[output]\ninstructions_file = \"vscode/personas/active.md\"\n",
    );

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "validate"])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("personas directory"));
}

#[test]
fn test_malformed_toml() {
    let ws = Workspace::empty();
    let config = ws.write_file("broken.toml", "[personas\ndir = ");

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("E101"));
}

// ─────────────────────────────────────────────────────────────────
// Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_file() {
    let ws = Workspace::empty();

    ws.cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("persona-switcher.toml"));

    let content = fs::read_to_string(ws.root().join("persona-switcher.toml")).unwrap();
    assert!(content.contains("[personas]"));

    ws.cmd().args(["config", "validate"]).assert().success();
}

#[test]
fn test_config_init_refuses_overwrite() {
    let ws = Workspace::empty();
    ws.write_file("persona-switcher.toml", "# mine\n");

    ws.cmd()
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(
        fs::read_to_string(ws.root().join("persona-switcher.toml")).unwrap(),
        "# mine\n"
    );
}

#[test]
fn test_config_init_force_custom_path() {
    let ws = Workspace::empty();
    ws.write_file("conf/ps.toml", "# old\n");

    ws.cmd()
        .args(["config", "init", "--force", "--path", "conf/ps.toml"])
        .assert()
        .success();

    let content = fs::read_to_string(ws.root().join("conf/ps.toml")).unwrap();
    assert!(content.contains("[output]"));
}

// ─────────────────────────────────────────────────────────────────
// Environment Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_override_output_file() {
    let ws = Workspace::with_personas(&[("coder", "Write code.")]);

    ws.cmd()
        .env("PERSONA_SWITCHER_OUTPUT_FILE", "CLAUDE.md")
        .args(["select", "coder"])
        .assert()
        .success();

    assert!(ws.root().join("CLAUDE.md").exists());
    assert!(ws.read_instructions().is_none());
}

#[test]
fn test_env_override_workspace() {
    let ws = Workspace::with_personas(&[("coder", "Write code.")]);
    let elsewhere = Workspace::empty();

    elsewhere
        .cmd()
        .env("PERSONA_SWITCHER_WORKSPACE", ws.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Coder"));
}

#[test]
fn test_tilde_expansion() {
    let ws = Workspace::with_personas(&[("coder", "Write code.")]);

    // HOME points at the workspace for every command
    ws.cmd()
        .env("PERSONA_SWITCHER_WORKSPACE", "~")
        .args(["select", "coder"])
        .assert()
        .success();

    assert!(ws.read_instructions().is_some());
}
