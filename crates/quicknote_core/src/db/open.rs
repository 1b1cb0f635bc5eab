//! Connection bootstrap for the note store.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections from a `StoreConfig`.
//! - Configure connection pragmas required by core behavior.
//! - Register the SQL functions used by note search.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections have migrations fully applied.

use super::functions::register_functions;
use super::migrations::apply_migrations;
use super::DbResult;
use crate::config::{StoreConfig, StoreLocation};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the store named by `config`.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `db_open` logging events with duration and status.
pub fn open_store(config: &StoreConfig) -> DbResult<Connection> {
    match &config.location {
        StoreLocation::Memory => open_db_in_memory(),
        StoreLocation::File(path) => open_db(path),
    }
}

/// Opens a SQLite database file and applies all pending migrations.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies all pending migrations.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(applied) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={} migrations_applied={}",
                started_at.elapsed().as_millis(),
                applied.len()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<Vec<u32>> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_functions(conn)?;
    apply_migrations(conn)
}
