//! Active marker — remembers the last successful publish across invocations.
//!
//! The marker lives beside the workspace state, never in the instructions
//! file, so the active persona is never inferred from published content.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::{Error, Result};

use super::atomic::write_atomic;
use super::publisher::PublishedPersona;

/// Contents of `active.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveMarker {
    pub display_name: String,
    pub slug: String,
    pub source_path: PathBuf,
    pub published_at: DateTime<Utc>,
}

impl ActiveMarker {
    pub fn from_published(published: &PublishedPersona) -> Self {
        Self {
            display_name: published.display_name.clone(),
            slug: published.slug.clone(),
            source_path: published.source_path.clone(),
            published_at: Utc::now(),
        }
    }
}

/// Reads and writes the marker file.
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the marker. A missing file means nothing was published yet.
    pub async fn load(&self) -> Result<Option<ActiveMarker>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::IoRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::StateCorrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })
    }

    /// Replace the marker atomically.
    pub async fn save(&self, marker: &ActiveMarker) -> Result<()> {
        let json = serde_json::to_string_pretty(marker)?;
        write_atomic(&self.path, json.as_bytes())
            .await
            .map_err(|e| Error::IoWrite {
                path: self.path.clone(),
                source: e,
            })?;
        debug!(path = %self.path.display(), persona = %marker.display_name, "Active marker saved");
        Ok(())
    }
}
