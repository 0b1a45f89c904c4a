//! Active persona publisher — writes the selected persona into the shared
//! instructions file.
//!
//! The published document is the banner, a blank line, then the persona text
//! verbatim. Nothing in it varies between runs, so publishing the same
//! persona twice yields byte-identical files.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::atomic::write_atomic;
use super::types::PersonaCatalog;

/// Result of a publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The instructions file now holds this persona.
    Published(PublishedPersona),
    /// The name was not in the catalog; nothing was touched.
    Skipped,
}

/// Details of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPersona {
    pub display_name: String,
    pub slug: String,
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub bytes: usize,
}

/// Owns the instructions file and everything written to it.
#[derive(Debug, Clone)]
pub struct Publisher {
    output_path: PathBuf,
    personas_label: String,
}

impl Publisher {
    /// `personas_label` is how the banner refers to the catalog directory,
    /// e.g. `vscode/personas/`.
    pub fn new(output_path: impl Into<PathBuf>, personas_label: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            personas_label: personas_label.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Fixed header explaining that the file is machine-managed.
    pub fn banner(&self) -> String {
        format!(
            "This file is managed by Persona Switcher.\n\
             The content of this file is automatically overwritten when you select a new persona.\n\
             To add or edit personas, see the files in the '{}' directory.\n\
             \n\
             ---",
            self.personas_label
        )
    }

    /// Full document for a persona's content. The content bytes are copied
    /// as-is, whatever their encoding.
    pub fn render_document(&self, content: &[u8]) -> Vec<u8> {
        let banner = self.banner();
        let mut document = Vec::with_capacity(banner.len() + 2 + content.len());
        document.extend_from_slice(banner.as_bytes());
        document.extend_from_slice(b"\n\n");
        document.extend_from_slice(content);
        document
    }

    /// Publish `display_name` from `catalog`.
    ///
    /// Names missing from the catalog are a no-op: a stale or cancelled pick
    /// must never clobber the instructions file.
    pub async fn publish(
        &self,
        catalog: &PersonaCatalog,
        display_name: &str,
    ) -> Result<PublishOutcome> {
        let Some(definition) = catalog.get(display_name) else {
            debug!(persona = %display_name, "Selection not in catalog, skipping publish");
            return Ok(PublishOutcome::Skipped);
        };

        let content = fs::read(&definition.source_path)
            .await
            .map_err(|e| Error::PersonaUnreadable {
                name: definition.display_name.clone(),
                path: definition.source_path.clone(),
                source: e,
            })?;

        let document = self.render_document(&content);
        write_atomic(&self.output_path, &document)
            .await
            .map_err(|e| Error::PublishWriteFailed {
                path: self.output_path.clone(),
                source: e,
            })?;

        info!(
            persona = %definition.display_name,
            output = %self.output_path.display(),
            bytes = document.len(),
            "Persona published"
        );

        Ok(PublishOutcome::Published(PublishedPersona {
            display_name: definition.display_name.clone(),
            slug: definition.slug.clone(),
            source_path: definition.source_path.clone(),
            output_path: self.output_path.clone(),
            bytes: document.len(),
        }))
    }
}
