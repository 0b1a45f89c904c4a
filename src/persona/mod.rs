//! Persona system — discover persona files, publish the selected one into the
//! shared instructions file, and keep the status label in step.
//!
//! Each persona is a markdown file in the catalog directory. Publishing
//! replaces the instructions file with a managed banner followed by the
//! persona text.

mod atomic;
pub mod manager;
pub mod marker;
pub mod publisher;
pub mod status;
pub mod store;
pub mod types;

pub use manager::{PersonaManager, SelectOutcome};
pub use marker::MarkerStore;
pub use publisher::Publisher;
pub use status::{render, HiddenStatus, StatusDisplay, TerminalStatus};
pub use store::PersonaStore;
pub use types::DEFAULT_PERSONA;
