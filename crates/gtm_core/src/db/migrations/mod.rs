//! Versioned schema scripts for the tracker database.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(version, script)`, strictly increasing by version.
const SCRIPTS: &[(u32, &str)] = &[(1, include_str!("0001_kv_entries.sql"))];

/// Highest schema version this build can write.
pub fn latest_version() -> u32 {
    SCRIPTS.last().map_or(0, |(version, _)| *version)
}

/// Version recorded in the database header.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Runs every script newer than the stored version in one transaction.
///
/// Returns the number of scripts applied.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::UnsupportedSchemaVersion { found, supported });
    }

    let pending: Vec<(u32, &str)> = SCRIPTS
        .iter()
        .copied()
        .filter(|(version, _)| *version > found)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for (version, script) in &pending {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration {
                version: *version,
                source,
            })?;
        info!("event=db_migrate module=db status=ok version={version}");
    }
    tx.commit()?;

    Ok(pending.len())
}
