//! QuickNote command-line entry point.
//!
//! # Responsibility
//! - Resolve store and logging configuration, then open the note store.
//! - Dispatch one-shot subcommands or the interactive mode selector.
//!
//! # Invariants
//! - Failing to open the store ends the process before any mode runs.

mod cli;
mod commands;
mod menu;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use log::{error, info};
use quicknote_core::db::open_store;
use quicknote_core::{
    default_log_level, init_logging, LogSettings, NoteService, SqliteNoteRepository, StoreConfig,
};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli);

    let config = match cli.db.as_deref() {
        Some(raw) => StoreConfig::from_connection_string(raw),
        None => StoreConfig::from_env(),
    }
    .context("invalid note store connection string")?;

    let mut conn = open_store(&config).with_context(|| {
        error!("event=cli_start module=cli status=error error_code=store_unreachable");
        format!("unable to connect to the note store at {}", config.location)
    })?;
    let repo = SqliteNoteRepository::try_new(&mut conn).context("note store is not ready")?;
    let mut service = NoteService::new(repo);
    info!(
        "event=cli_start module=cli status=ok store={} core_version={}",
        config.location,
        quicknote_core::core_version()
    );

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            menu::MenuSession::new(&mut service, stdin.lock(), io::stdout()).run()?;
        }
        command => {
            let stdout = io::stdout();
            commands::run_command(&mut service, command, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) {
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let dir = cli.log_dir.clone().unwrap_or_else(LogSettings::default_dir);

    // Logging is best-effort; the note store stays usable without it.
    if let Err(err) = LogSettings::new(level, &dir).and_then(|settings| init_logging(&settings)) {
        eprintln!("warning: logging disabled: {err}");
    }
}
