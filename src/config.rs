//! Configuration system for persona-switcher
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (PERSONA_SWITCHER_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Main switcher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitcherConfig {
    /// Workspace the switcher operates on
    pub workspace: WorkspaceSettings,

    /// Where persona definitions live
    pub personas: PersonaSettings,

    /// Where the active persona is published
    pub output: OutputSettings,

    /// Where the active-persona marker is kept
    pub state: StateSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Workspace settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Workspace root; every relative path below is resolved against it
    pub root: String,
}

/// Persona catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Directory scanned for `*.md` persona definitions
    pub dir: String,
}

/// Published instructions settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// File overwritten with the banner plus the selected persona
    pub instructions_file: String,
}

/// State settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Directory holding `active.json`
    pub dir: String,

    /// Record the last successful selection so `status` can report it
    pub persist_active: bool,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (unset = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
        }
    }
}

impl Default for PersonaSettings {
    fn default() -> Self {
        Self {
            dir: "vscode/personas".to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            instructions_file: ".github/copilot-instructions.md".to_string(),
        }
    }
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            dir: ".persona-switcher".to_string(),
            persist_active: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 10,
            max_files: 5,
            json_format: false,
        }
    }
}

impl SwitcherConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| Error::IoRead {
                path: path.clone(),
                source: e,
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.clone(),
                source: e,
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        config.apply_env_overrides();
        config.expand_paths();
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::ConfigNotFound { path });
        }

        let search_paths = [
            Some(PathBuf::from("persona-switcher.toml")),
            dirs::config_dir().map(|p| p.join("persona-switcher").join("config.toml")),
            dirs::home_dir().map(|p| p.join(".persona-switcher").join("config.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_WORKSPACE") {
            self.workspace.root = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_PERSONAS_DIR") {
            self.personas.dir = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_OUTPUT_FILE") {
            self.output.instructions_file = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_STATE_DIR") {
            self.state.dir = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_PERSIST_ACTIVE") {
            self.state.persist_active = parse_bool(&val);
        }

        if let Ok(val) = std::env::var("PERSONA_SWITCHER_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("PERSONA_SWITCHER_LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }
    }

    /// Expand ~ and environment variables in paths
    fn expand_paths(&mut self) {
        self.workspace.root = expand_path(&self.workspace.root);
        self.personas.dir = expand_path(&self.personas.dir);
        self.output.instructions_file = expand_path(&self.output.instructions_file);
        self.state.dir = expand_path(&self.state.dir);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Override the workspace root (from `--workspace`)
    pub fn set_workspace_root(&mut self, root: &str) {
        self.workspace.root = expand_path(root);
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.workspace.root.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "workspace.root",
                "Workspace root cannot be empty",
            ));
        }
        if self.personas.dir.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "personas.dir",
                "Personas directory cannot be empty",
            ));
        }
        if self.output.instructions_file.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "output.instructions_file",
                "Instructions file cannot be empty",
            ));
        }
        if self.output.instructions_file.ends_with('/') {
            return Err(Error::config_field_invalid(
                "output.instructions_file",
                "Instructions file must name a file, not a directory",
            ));
        }

        // A file published into the catalog directory would show up as a persona.
        let output_parent = self.instructions_file().parent().map(Path::to_path_buf);
        if output_parent.as_deref() == Some(self.personas_dir().as_path()) {
            return Err(Error::config_field_invalid(
                "output.instructions_file",
                "Instructions file must not live inside the personas directory",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Workspace root as a PathBuf
    pub fn workspace_root(&self) -> PathBuf {
        PathBuf::from(&self.workspace.root)
    }

    /// Check that the workspace root exists
    pub fn ensure_workspace(&self) -> Result<PathBuf> {
        let root = self.workspace_root();
        if !root.is_dir() {
            return Err(Error::WorkspaceMissing { path: root });
        }
        Ok(root)
    }

    /// Absolute (or workspace-relative) persona directory
    pub fn personas_dir(&self) -> PathBuf {
        self.workspace_root().join(&self.personas.dir)
    }

    /// Persona directory as it should be named in the published banner
    pub fn personas_label(&self) -> String {
        format!("{}/", self.personas.dir.trim_end_matches('/'))
    }

    /// Instructions file path
    pub fn instructions_file(&self) -> PathBuf {
        self.workspace_root().join(&self.output.instructions_file)
    }

    /// Active marker path, if persisting the selection is enabled
    pub fn marker_file(&self) -> Option<PathBuf> {
        self.state
            .persist_active
            .then(|| self.workspace_root().join(&self.state.dir).join("active.json"))
    }
}

fn parse_bool(val: &str) -> bool {
    val.eq_ignore_ascii_case("true") || val == "1"
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or(std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| PathBuf::from("persona-switcher.toml"));

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# persona-switcher configuration

[workspace]
# Workspace root; relative paths below are resolved against it
root = "."

[personas]
# Directory holding one markdown file per persona (e.g. principal-engineer.md)
dir = "vscode/personas"

[output]
# File overwritten with the selected persona
instructions_file = ".github/copilot-instructions.md"

[state]
# Directory holding active.json (the last successful selection)
dir = ".persona-switcher"
persist_active = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.persona-switcher/logs/switcher.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 10

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
