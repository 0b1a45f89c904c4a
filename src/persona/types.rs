//! Core types for the persona system.
//!
//! A persona is a markdown file in the catalog directory. Its file stem is the
//! canonical identifier (`principal-engineer`) and its display name is derived
//! from it (`Principal Engineer`).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extension that marks a directory entry as a persona definition.
pub const PERSONA_EXTENSION: &str = "md";

/// Name shown by the status indicator before anything has been published.
pub const DEFAULT_PERSONA: &str = "default";

// ─────────────────────────────────────────────────────────────────
// Name Formatting
// ─────────────────────────────────────────────────────────────────

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive a display name from a hyphen-case file stem.
///
/// `senior-reviewer` becomes `Senior Reviewer`. The split is literal, so
/// consecutive hyphens produce empty tokens and therefore repeated spaces.
pub fn display_name_for(stem: &str) -> String {
    stem.split('-')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

// ─────────────────────────────────────────────────────────────────
// Persona Definition
// ─────────────────────────────────────────────────────────────────

/// A persona discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    /// Human-readable name, unique within one catalog.
    pub display_name: String,

    /// File stem the display name was derived from.
    pub slug: String,

    /// File holding the persona's raw text.
    pub source_path: PathBuf,
}

impl PersonaDefinition {
    /// Build a definition from a `*.md` path.
    ///
    /// Returns `None` when the path has the wrong extension or a stem that
    /// is not valid UTF-8.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let source_path = path.into();
        if !is_persona_file(&source_path) {
            return None;
        }
        let slug = source_path.file_stem()?.to_str()?.to_string();

        Some(Self {
            display_name: display_name_for(&slug),
            slug,
            source_path,
        })
    }
}

/// Whether a path carries the persona extension (case-sensitive).
pub fn is_persona_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(PERSONA_EXTENSION)
}

// ─────────────────────────────────────────────────────────────────
// Persona Catalog
// ─────────────────────────────────────────────────────────────────

/// Display name → definition, as produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaCatalog {
    source_dir: PathBuf,
    entries: BTreeMap<String, PersonaDefinition>,
}

impl PersonaCatalog {
    /// Empty catalog for a directory.
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Directory this catalog was scanned from.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Add a definition. Returns the definition it displaced, if any.
    pub fn insert(&mut self, definition: PersonaDefinition) -> Option<PersonaDefinition> {
        self.entries
            .insert(definition.display_name.clone(), definition)
    }

    pub fn get(&self, display_name: &str) -> Option<&PersonaDefinition> {
        self.entries.get(display_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaDefinition> {
        self.entries.values()
    }

    /// Map free-form user input to a display name.
    ///
    /// Tries the exact display name, then a case-insensitive match, then
    /// the file slug.
    pub fn resolve(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if let Some((name, _)) = self.entries.get_key_value(input) {
            return Some(name.as_str());
        }

        let lowered = input.to_lowercase();
        self.entries
            .values()
            .find(|d| d.display_name.to_lowercase() == lowered)
            .or_else(|| self.entries.values().find(|d| d.slug == input))
            .map(|d| d.display_name.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────
// Active Selection
// ─────────────────────────────────────────────────────────────────

/// The persona currently published, or the default sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveSelection {
    /// Nothing has been published in this session.
    #[default]
    Default,
    /// A persona was published successfully.
    Persona(String),
}

impl ActiveSelection {
    /// Name handed to the status indicator.
    pub fn status_name(&self) -> &str {
        match self {
            ActiveSelection::Default => DEFAULT_PERSONA,
            ActiveSelection::Persona(name) => name,
        }
    }
}

impl fmt::Display for ActiveSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_name())
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
