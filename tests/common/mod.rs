//! Common test utilities and fixtures
//!
//! Builds throwaway workspaces and runs the binary isolated from the
//! developer's own configuration.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Banner written above every published persona with the default layout
pub const DEFAULT_BANNER: &str = "This file is managed by Persona Switcher.\n\
The content of this file is automatically overwritten when you select a new persona.\n\
To add or edit personas, see the files in the 'vscode/personas/' directory.\n\
\n\
---";

const ENV_OVERRIDES: &[&str] = &[
    "PERSONA_SWITCHER_CONFIG",
    "PERSONA_SWITCHER_WORKSPACE",
    "PERSONA_SWITCHER_PERSONAS_DIR",
    "PERSONA_SWITCHER_OUTPUT_FILE",
    "PERSONA_SWITCHER_STATE_DIR",
    "PERSONA_SWITCHER_PERSIST_ACTIVE",
    "PERSONA_SWITCHER_LOG_LEVEL",
    "PERSONA_SWITCHER_LOG_FILE",
    "PERSONA_SWITCHER_LOG_JSON",
    "RUST_LOG",
    "XDG_CONFIG_HOME",
];

/// A temporary workspace with the default directory layout
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Empty workspace without a persona directory
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Workspace whose persona directory holds `personas` as (stem, content)
    pub fn with_personas(personas: &[(&str, &str)]) -> Self {
        let ws = Self::empty();
        fs::create_dir_all(ws.personas_dir()).unwrap();
        for (stem, content) in personas {
            ws.add_persona(stem, content);
        }
        ws
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn personas_dir(&self) -> PathBuf {
        self.root().join("vscode").join("personas")
    }

    pub fn instructions_file(&self) -> PathBuf {
        self.root().join(".github").join("copilot-instructions.md")
    }

    pub fn marker_file(&self) -> PathBuf {
        self.root().join(".persona-switcher").join("active.json")
    }

    pub fn add_persona(&self, stem: &str, content: &str) {
        fs::write(self.personas_dir().join(format!("{}.md", stem)), content).unwrap();
    }

    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn read_instructions(&self) -> Option<String> {
        fs::read_to_string(self.instructions_file()).ok()
    }

    /// The binary, run from the workspace root with a private HOME
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("persona-switcher").unwrap();
        cmd.current_dir(self.root()).env("HOME", self.root());
        for var in ENV_OVERRIDES {
            cmd.env_remove(var);
        }
        cmd
    }
}
