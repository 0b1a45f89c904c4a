//! Status indicator — the short label naming the active persona.
//!
//! [`render`] is the pure formatting step. [`StatusIndicator`] is the scoped
//! handle around whatever actually displays the label: it shows the default
//! label when acquired and disposes the display exactly once, either through
//! [`StatusIndicator::dispose`] or on drop.

use std::io::Write;

use tracing::debug;

use super::types::{capitalize_first, DEFAULT_PERSONA};

/// Marker placed in front of every label.
pub const STATUS_ICON: &str = "$(hubot)";

/// Format the status label for a persona name.
pub fn render(name: &str) -> String {
    format!("{} Persona: {}", STATUS_ICON, capitalize_first(name))
}

/// Something that can display the status label.
pub trait StatusDisplay {
    /// Replace the displayed text.
    fn show(&mut self, text: &str);

    /// Release the display. Called at most once.
    fn dispose(&mut self) {}
}

/// Prints every label change as a status line on stdout.
#[derive(Debug, Default)]
pub struct TerminalStatus;

impl StatusDisplay for TerminalStatus {
    fn show(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "[{}]", text);
        let _ = out.flush();
    }

    fn dispose(&mut self) {
        debug!("Terminal status line released");
    }
}

/// Keeps the label in memory only, for one-shot commands that print the
/// final label themselves.
#[derive(Debug, Default)]
pub struct HiddenStatus;

impl StatusDisplay for HiddenStatus {
    fn show(&mut self, _text: &str) {}
}

/// Owned handle to the status display.
pub struct StatusIndicator {
    display: Box<dyn StatusDisplay>,
    label: String,
    disposed: bool,
}

impl StatusIndicator {
    /// Acquire the display and show the default label.
    pub fn new(display: Box<dyn StatusDisplay>) -> Self {
        let mut indicator = Self {
            display,
            label: String::new(),
            disposed: false,
        };
        indicator.update(DEFAULT_PERSONA);
        indicator
    }

    /// Show the label for `name`. Ignored after disposal.
    pub fn update(&mut self, name: &str) {
        if self.disposed {
            return;
        }
        self.label = render(name);
        self.display.show(&self.label);
    }

    /// Label currently displayed.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Release the display. Safe to call more than once.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.display.dispose();
        }
    }
}

impl Drop for StatusIndicator {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for StatusIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusIndicator")
            .field("label", &self.label)
            .field("disposed", &self.disposed)
            .finish()
    }
}
