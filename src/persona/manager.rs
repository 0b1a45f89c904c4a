//! Persona manager — owns the catalog, the active selection and the status
//! indicator, and runs scan → select → publish → status update.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::notify::Notifier;

use super::marker::{ActiveMarker, MarkerStore};
use super::publisher::{PublishOutcome, PublishedPersona, Publisher};
use super::status::{StatusDisplay, StatusIndicator};
use super::store::PersonaStore;
use super::types::{ActiveSelection, PersonaCatalog};

/// Result of a selection request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The persona was published and is now active.
    Switched(PublishedPersona),
    /// The name was not in the current catalog; nothing changed.
    Ignored,
}

// ─────────────────────────────────────────────────────────────────
// Persona Manager
// ─────────────────────────────────────────────────────────────────

/// Coordinates the persona lifecycle for one workspace.
pub struct PersonaManager {
    store: PersonaStore,
    publisher: Publisher,
    marker: Option<MarkerStore>,
    notifier: Box<dyn Notifier>,

    /// Catalog from the latest scan; empty until the first successful one.
    catalog: PersonaCatalog,

    /// Changed only by a successful publish.
    active: ActiveSelection,

    status: StatusIndicator,
}

impl PersonaManager {
    /// Create a manager. The status display is acquired immediately and shows
    /// the default label; the catalog stays empty until [`refresh`](Self::refresh).
    pub fn new(
        store: PersonaStore,
        publisher: Publisher,
        display: Box<dyn StatusDisplay>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let catalog = PersonaCatalog::new(store.dir());
        Self {
            store,
            publisher,
            marker: None,
            notifier,
            catalog,
            active: ActiveSelection::Default,
            status: StatusIndicator::new(display),
        }
    }

    /// Record each successful publish in `marker`.
    pub fn with_marker(mut self, marker: MarkerStore) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn catalog(&self) -> &PersonaCatalog {
        &self.catalog
    }

    pub fn active(&self) -> &ActiveSelection {
        &self.active
    }

    pub fn status_label(&self) -> &str {
        self.status.label()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    // ─────────────────────────────────────────────────────────────
    // Scan
    // ─────────────────────────────────────────────────────────────

    /// Rescan the persona directory, replacing the catalog.
    ///
    /// On failure the catalog is emptied rather than left stale, the user is
    /// notified, and the error is returned for the caller's exit status.
    pub async fn refresh(&mut self) -> Result<usize> {
        match self.store.scan().await {
            Ok(catalog) => {
                self.catalog = catalog;
                info!(count = self.catalog.len(), "Personas loaded");
                Ok(self.catalog.len())
            }
            Err(e) => {
                self.catalog = PersonaCatalog::new(self.store.dir());
                warn!(error = %e.format_for_log(), "Persona scan failed, catalog cleared");
                self.notifier.error(&e.notification());
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Select
    // ─────────────────────────────────────────────────────────────

    /// Publish `display_name` and, only once it is on disk, make it active.
    pub async fn select(&mut self, display_name: &str) -> Result<SelectOutcome> {
        let published = match self.publisher.publish(&self.catalog, display_name).await {
            Ok(PublishOutcome::Published(published)) => published,
            Ok(PublishOutcome::Skipped) => return Ok(SelectOutcome::Ignored),
            Err(e) => {
                warn!(persona = %display_name, error = %e.format_for_log(), "Persona switch failed");
                self.notifier.error(&e.notification());
                return Err(e);
            }
        };

        self.active = ActiveSelection::Persona(published.display_name.clone());
        self.status.update(&published.display_name);
        self.record_marker(&published).await;
        self.notifier
            .info(&format!("Persona changed to: {}", published.display_name));

        Ok(SelectOutcome::Switched(published))
    }

    async fn record_marker(&self, published: &PublishedPersona) {
        let Some(ref marker) = self.marker else {
            return;
        };
        // The instructions file is already written; a stale marker only
        // affects later `status` reports.
        if let Err(e) = marker.save(&ActiveMarker::from_published(published)).await {
            warn!(error = %e.format_for_log(), "Failed to record active persona");
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Shutdown
    // ─────────────────────────────────────────────────────────────

    /// Release the status display.
    pub fn shutdown(mut self) {
        debug!(active = %self.active, "Persona manager shutting down");
        self.status.dispose();
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
