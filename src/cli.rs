//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the persona switcher.

use clap::{Parser, Subcommand};

/// Persona Switcher - publish a persona into the assistant instructions file
///
/// Scans the workspace persona directory for markdown files and writes the
/// selected one, behind a managed banner, into the shared instructions file.
#[derive(Parser, Debug)]
#[command(name = "persona-switcher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "PERSONA_SWITCHER_CONFIG", global = true)]
    pub config: Option<String>,

    /// Workspace root (overrides configuration)
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the persona directory and list the catalog
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a persona into the instructions file
    Select {
        /// Display name (any case) or file slug, e.g. "Qa Engineer" or qa-engineer
        name: String,
    },

    /// Show the status label for the last published persona
    Status,

    /// Pick personas interactively until quit or Ctrl+C
    Interactive,

    /// Print the banner placed at the top of the instructions file
    Banner,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}
