//! Schema migrations for the notes collection.
//!
//! # Responsibility
//! - List the note store's schema steps in version order.
//! - Bring a connection from its recorded version up to [`latest_version`].
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - All pending steps commit together or not at all.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "notes",
        sql: include_str!("0001_notes.sql"),
    },
    Migration {
        version: 2,
        name: "note_tags",
        sql: include_str!("0002_note_tags.sql"),
    },
];

/// Returns the newest schema version this build can open.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Returns the schema version recorded in the database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies every step newer than the recorded version.
///
/// Returns the versions applied by this call, oldest first; empty when the
/// store was already current.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the store was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<Vec<u32>> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        error!(
            "event=db_migrate module=db status=error error_code=schema_too_new db_version={current} latest_supported={latest}"
        );
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    let pending = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        return Ok(Vec::new());
    }

    let tx = conn.transaction()?;
    for migration in &pending {
        if let Err(err) = tx.execute_batch(migration.sql) {
            error!(
                "event=db_migrate module=db status=error version={} name={} error={err}",
                migration.version, migration.name
            );
            return Err(err.into());
        }
        tx.pragma_update(None, "user_version", migration.version)?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current} to_version={latest}");
    Ok(pending.iter().map(|migration| migration.version).collect())
}
