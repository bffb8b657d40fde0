//! SQLite schema, session handle and per-entity repositories.

mod contacts;
pub(crate) mod modes;
pub(crate) mod registry;
/// SQLite-backed [`Logbook`] session handle.
pub mod sqlite;

pub use sqlite::Logbook;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};

use crate::error::{LogbookError, LogbookResult};

/// Fixed-width UTC text so lexical order matches time order.
pub(crate) fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(std::io::Error::other(err)),
            )
        })
}

/// Fails with [`LogbookError::ReferentialIntegrity`] when `table` has no row `id`.
pub(crate) fn ensure_parent(
    conn: &Connection,
    table: &str,
    entity: &str,
    id: i64,
) -> LogbookResult<()> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    let exists: bool = conn.query_row(&sql, params![id], |row| row.get(0))?;
    if !exists {
        return Err(LogbookError::ReferentialIntegrity(format!(
            "{entity} {id} does not exist"
        )));
    }
    Ok(())
}

/// Fails with [`LogbookError::ReferentialIntegrity`] when any `(table, column)`
/// dependant still references `id`.
pub(crate) fn ensure_unreferenced(
    conn: &Connection,
    entity: &str,
    id: i64,
    dependants: &[(&str, &str)],
) -> LogbookResult<()> {
    for (table, column) in dependants {
        let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?1");
        let count: i64 = conn.query_row(&sql, params![id], |row| row.get(0))?;
        if count > 0 {
            return Err(LogbookError::ReferentialIntegrity(format!(
                "{entity} {id} is referenced by {count} row(s) in {table}"
            )));
        }
    }
    Ok(())
}

/// Maps "zero rows changed" to [`LogbookError::NotFound`].
pub(crate) fn expect_changed(changed: usize, entity: &'static str, id: impl ToString) -> LogbookResult<()> {
    if changed == 0 {
        return Err(LogbookError::not_found(entity, id));
    }
    Ok(())
}
