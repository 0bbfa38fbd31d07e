//! Connection bootstrap.
//!
//! # Invariants
//! - File-backed connections run in WAL mode so another process can read
//!   the tracker while this one writes.
//! - Returned connections have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Wait applied when another connection holds the write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    File,
    Memory,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating when missing) the tracker database at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(Mode::File, || Connection::open(path))
}

/// Opens a private in-memory database, mostly for tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with(Mode::Memory, Connection::open_in_memory)
}

fn open_with(
    mode: Mode,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();

    let opened = connect()
        .map_err(DbError::from)
        .and_then(|mut conn| prepare(&mut conn, mode).map(|migrated| (conn, migrated)));

    match opened {
        Ok((conn, migrated)) => {
            info!(
                "event=db_open module=db status=ok mode={} migrated={} duration_ms={}",
                mode.as_str(),
                migrated,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
                mode.as_str(),
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn prepare(conn: &mut Connection, mode: Mode) -> DbResult<usize> {
    if mode == Mode::File {
        // journal_mode answers with a row.
        conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
    }
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
