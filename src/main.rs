//! Persona Switcher - publish AI assistant personas into a workspace
//!
//! This is the main entry point for the persona-switcher binary.
//! Personas are markdown files in the workspace persona directory; selecting
//! one overwrites the shared instructions file with a managed banner followed
//! by the persona text.

mod cli;
mod config;
mod error;
mod logging;
mod notify;
mod persona;
mod session;
mod version;

use clap::Parser;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands, ConfigSubcommand};
use crate::config::SwitcherConfig;
use crate::error::{Error, Result};
use crate::notify::TerminalNotifier;
use crate::persona::{
    render, HiddenStatus, MarkerStore, PersonaManager, PersonaStore, Publisher, StatusDisplay,
    TerminalStatus, DEFAULT_PERSONA,
};
use crate::session::LinePicker;
use crate::version::BuildInfo;

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Commands that don't need the workspace or full logging
    match &cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(&cli, subcommand.clone());
        }
        _ => {}
    }

    let config = load_config(&cli)?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = BuildInfo::current();
    debug!(
        version = %build.full_version(),
        target = %build.target,
        workspace = %config.workspace.root,
        "Starting persona switcher"
    );

    if let Commands::Banner = cli.command {
        println!("{}", publisher_for(&config).banner());
        return Ok(());
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to create runtime: {}", e)))?;

    match cli.command {
        Commands::List { json } => rt.block_on(list_personas(&config, json, cli.quiet)),
        Commands::Select { ref name } => rt.block_on(select_persona(&config, name, cli.quiet)),
        Commands::Status => rt.block_on(show_status(&config)),
        Commands::Interactive => rt.block_on(run_interactive(&config, cli.quiet)),
        // Handled above
        Commands::Banner | Commands::Version | Commands::Config { .. } => Ok(()),
    }
}

/// Print an error for the terminal. Failures the notifier already reported
/// only get their hint.
fn report(e: &Error) {
    if e.is_notified() {
        if let Some(hint) = e.suggestion() {
            eprintln!("\n\x1b[33mHint\x1b[0m: {}", hint);
        }
    } else {
        eprint!("{}", e.format_for_terminal());
    }
}

/// Load configuration and apply CLI overrides
fn load_config(cli: &Cli) -> Result<SwitcherConfig> {
    let mut config = SwitcherConfig::load(cli.config.as_deref())?;
    if let Some(ref workspace) = cli.workspace {
        config.set_workspace_root(workspace);
        config.validate()?;
    }
    Ok(config)
}

fn publisher_for(config: &SwitcherConfig) -> Publisher {
    Publisher::new(config.instructions_file(), config.personas_label())
}

/// Build a persona manager for the configured workspace
fn build_manager(
    config: &SwitcherConfig,
    display: Box<dyn StatusDisplay>,
    quiet: bool,
) -> Result<PersonaManager> {
    let root = config.ensure_workspace()?;
    info!(
        workspace = %root.display(),
        personas = %config.personas_dir().display(),
        output = %config.instructions_file().display(),
        "Workspace resolved"
    );

    let manager = PersonaManager::new(
        PersonaStore::new(config.personas_dir()),
        publisher_for(config),
        display,
        Box::new(TerminalNotifier::new(quiet)),
    );

    Ok(match config.marker_file() {
        Some(path) => manager.with_marker(MarkerStore::new(path)),
        None => manager,
    })
}

/// Display name recorded by the last successful publish, if any
async fn recorded_persona(config: &SwitcherConfig) -> Result<Option<String>> {
    match config.marker_file() {
        Some(path) => Ok(MarkerStore::new(path)
            .load()
            .await?
            .map(|marker| marker.display_name)),
        None => Ok(None),
    }
}

// ─────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────

/// Scan and print the catalog
async fn list_personas(config: &SwitcherConfig, json: bool, quiet: bool) -> Result<()> {
    let mut manager = build_manager(config, Box::new(HiddenStatus), quiet)?;
    manager.refresh().await?;
    let catalog = manager.catalog();

    if json {
        let entries: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No personas found in {}", catalog.source_dir().display());
        return Ok(());
    }

    let active = match recorded_persona(config).await {
        Ok(active) => active,
        Err(e) => {
            warn!(error = %e.format_for_log(), "Ignoring unreadable active marker");
            None
        }
    };

    println!("Personas in {}:", catalog.source_dir().display());
    for definition in catalog.iter() {
        let mark = if active.as_deref() == Some(definition.display_name.as_str()) {
            '*'
        } else {
            ' '
        };
        println!(
            "{} {:<28} {}",
            mark, definition.display_name, definition.slug
        );
    }

    Ok(())
}

/// Publish one persona and print the resulting status label
async fn select_persona(config: &SwitcherConfig, name: &str, quiet: bool) -> Result<()> {
    let mut manager = build_manager(config, Box::new(HiddenStatus), quiet)?;
    manager.refresh().await?;

    let Some(resolved) = manager.catalog().resolve(name).map(str::to_string) else {
        return Err(Error::selection_not_found(name));
    };

    manager.select(&resolved).await?;
    info!(
        output = %manager.publisher().output_path().display(),
        "Instructions file updated"
    );
    if !quiet {
        println!("{}", manager.status_label());
    }
    manager.shutdown();

    Ok(())
}

/// Report the persona recorded by the last successful publish
async fn show_status(config: &SwitcherConfig) -> Result<()> {
    config.ensure_workspace()?;
    let name = recorded_persona(config).await?;
    println!("{}", render(name.as_deref().unwrap_or(DEFAULT_PERSONA)));
    Ok(())
}

/// Run the picker loop on stdin until quit, end of input or Ctrl+C
async fn run_interactive(config: &SwitcherConfig, quiet: bool) -> Result<()> {
    let mut manager = build_manager(config, Box::new(TerminalStatus), quiet)?;
    if manager.refresh().await.is_err() {
        debug!("Starting with an empty catalog");
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let mut picker = LinePicker::stdin();
    let result = session::run_session(&mut manager, &mut picker, shutdown).await;
    manager.shutdown();
    let stats = result?;

    if !quiet {
        println!(
            "Session ended: {} switch(es), {} failure(s)",
            stats.switches, stats.failures
        );
    }
    Ok(())
}

/// Handle config subcommands
fn handle_config_command(cli: &Cli, subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = load_config(cli)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let created = config::init_config(path.as_deref(), force)?;
            println!("Created configuration file: {}", created.display());
        }
        ConfigSubcommand::Validate => {
            let cfg = load_config(cli)?;
            println!("Configuration is valid.");
            if !cfg.personas_dir().is_dir() {
                println!(
                    "Note: personas directory {} does not exist yet.",
                    cfg.personas_dir().display()
                );
            }
        }
    }

    Ok(())
}
