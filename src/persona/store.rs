//! Persona store — discovers persona definitions in a directory.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

use super::types::{is_persona_file, PersonaCatalog, PersonaDefinition};

/// Scans one directory for `*.md` persona definitions.
#[derive(Debug, Clone)]
pub struct PersonaStore {
    dir: PathBuf,
}

impl PersonaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory being scanned.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Build a fresh catalog from the directory contents.
    ///
    /// Entries are processed in file-name order so that display-name
    /// collisions resolve the same way on every platform: the later file
    /// wins and the displaced one is logged.
    pub async fn scan(&self) -> Result<PersonaCatalog> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::directory_unavailable(&self.dir, e))?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::directory_unavailable(&self.dir, e))?
        {
            let path = entry.path();
            if !is_persona_file(&path) {
                trace!(path = %path.display(), "Ignoring non-persona entry");
                continue;
            }
            if matches!(entry.file_type().await, Ok(ft) if ft.is_dir()) {
                trace!(path = %path.display(), "Ignoring directory with persona extension");
                continue;
            }
            candidates.push(path);
        }
        candidates.sort();

        let mut catalog = PersonaCatalog::new(&self.dir);
        for path in candidates {
            let Some(definition) = PersonaDefinition::from_path(&path) else {
                warn!(path = %path.display(), "Skipping persona with a non UTF-8 file name");
                continue;
            };
            if let Some(displaced) = catalog.insert(definition) {
                warn!(
                    persona = %displaced.display_name,
                    shadowed = %displaced.source_path.display(),
                    winner = %path.display(),
                    "Duplicate persona display name, keeping the later file"
                );
            }
        }

        debug!(dir = %self.dir.display(), count = catalog.len(), "Persona catalog scanned");
        Ok(catalog)
    }
}
