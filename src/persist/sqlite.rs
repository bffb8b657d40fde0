//! SQLite session handle.

use std::path::Path;

use rusqlite::{Connection, Transaction};

use crate::error::LogbookResult;

/// Open logbook database.
///
/// Every mutating method runs inside its own transaction: it commits once
/// every check and write has succeeded, and rolls back on drop otherwise.
pub struct Logbook {
    conn: Connection,
}

impl Logbook {
    /// Opens or creates a logbook database at `path`.
    ///
    /// Enables foreign keys and WAL mode and applies the schema.
    pub fn open(path: impl AsRef<Path>) -> LogbookResult<Self> {
        let path = path.as_ref();
        log::info!("opening logbook database {}", path.display());
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory logbook.
    pub fn open_in_memory() -> LogbookResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> LogbookResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Schema version recorded in the database.
    pub fn schema_version(&self) -> LogbookResult<u32> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(version)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Runs `f` in one transaction, committing only when it returns `Ok`.
    pub(crate) fn with_tx<T>(
        &mut self,
        f: impl FnOnce(&Transaction<'_>) -> LogbookResult<T>,
    ) -> LogbookResult<T> {
        let tx = self.conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}
