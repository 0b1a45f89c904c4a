//! Error types for persona-switcher
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - The user-facing notification text for each failure
//! - Suggestions and exit codes for the CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for switcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,
    StateCorrupt = 204,

    // Persona errors (3xx)
    DirectoryUnavailable = 300,
    PersonaUnreadable = 301,
    PublishWriteFailed = 302,
    SelectionNotFound = 303,
    WorkspaceMissing = 304,

    // Internal errors (9xx)
    InternalError = 900,
    SerializationError = 901,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the switcher
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation {
        message: String,
        field: Option<String>,
    },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The active-persona marker exists but cannot be decoded
    #[error("State file {path} is corrupt: {message}")]
    StateCorrupt { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────
    // Persona Errors
    // ─────────────────────────────────────────────────────────────

    /// The persona directory cannot be listed
    #[error("cannot list persona directory {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file of a selected persona cannot be read
    #[error("cannot read persona '{name}' from {path}: {source}")]
    PersonaUnreadable {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The instructions file could not be written
    #[error("cannot write instructions file {path}: {source}")]
    PublishWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The selected name is not in the current catalog
    #[error("no persona named '{name}' in the catalog")]
    SelectionNotFound { name: String },

    /// The workspace root does not exist
    #[error("Persona Switcher requires an open workspace: {path} is not a directory")]
    WorkspaceMissing { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::StateCorrupt { .. } => ErrorCode::StateCorrupt,

            Error::DirectoryUnavailable { .. } => ErrorCode::DirectoryUnavailable,
            Error::PersonaUnreadable { .. } => ErrorCode::PersonaUnreadable,
            Error::PublishWriteFailed { .. } => ErrorCode::PublishWriteFailed,
            Error::SelectionNotFound { .. } => ErrorCode::SelectionNotFound,
            Error::WorkspaceMissing { .. } => ErrorCode::WorkspaceMissing,

            Error::Toml(_) | Error::Json(_) => ErrorCode::SerializationError,
            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Whether re-running the scan or the selection can succeed without
    /// changing configuration
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DirectoryUnavailable { .. }
                | Error::PersonaUnreadable { .. }
                | Error::PublishWriteFailed { .. }
                | Error::SelectionNotFound { .. }
        )
    }

    /// Whether the persona manager has already reported this failure
    /// through the notifier.
    pub fn is_notified(&self) -> bool {
        matches!(
            self,
            Error::DirectoryUnavailable { .. }
                | Error::PersonaUnreadable { .. }
                | Error::PublishWriteFailed { .. }
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Facing Messages
    // ─────────────────────────────────────────────────────────────

    /// Message handed to the notification channel
    pub fn notification(&self) -> String {
        match self {
            Error::DirectoryUnavailable { .. } => format!("Failed to load personas: {}", self),
            Error::PersonaUnreadable { .. } | Error::PublishWriteFailed { .. } => {
                format!("Failed to switch persona: {}", self)
            }
            _ => self.to_string(),
        }
    }

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-switcher config init' to create a default configuration file.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-switcher config validate' to see details.",
            ),
            Error::ConfigValidation { .. } | Error::Config(_) => {
                Some("Review the configuration file and fix the invalid values.")
            }
            Error::StateCorrupt { .. } => Some(
                "Delete the state file; it is rewritten on the next successful selection.",
            ),
            Error::DirectoryUnavailable { .. } => Some(
                "Create the personas directory or point 'personas.dir' at an existing one.",
            ),
            Error::PersonaUnreadable { .. } => Some(
                "The persona file may have been moved or deleted. Run 'persona-switcher list' to rescan.",
            ),
            Error::PublishWriteFailed { .. } => Some(
                "Check that the instructions file and its directory are writable.",
            ),
            Error::SelectionNotFound { .. } => {
                Some("Run 'persona-switcher list' to see the available personas.")
            }
            Error::WorkspaceMissing { .. } => Some(
                "Run from inside a workspace or pass --workspace <dir>.",
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a directory unavailable error
    pub fn directory_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a selection not found error
    pub fn selection_not_found(name: impl Into<String>) -> Self {
        Error::SelectionNotFound { name: name.into() }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
