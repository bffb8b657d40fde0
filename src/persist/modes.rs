//! Transmission mode catalog.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    error::{LogbookError, LogbookResult},
    reference::{Mode, require_text},
    types::ModeId,
};

use super::{Logbook, ensure_unreferenced, expect_changed};

impl Logbook {
    /// Adds a mode.
    pub fn create_mode(&mut self, name: &str) -> LogbookResult<Mode> {
        let mode = self.with_tx(|tx| insert_mode(tx, name))?;
        log::info!("created mode {} ({})", mode.id, mode.name);
        Ok(mode)
    }

    /// Looks up a mode by id.
    pub fn get_mode(&self, id: ModeId) -> LogbookResult<Mode> {
        self.conn()
            .query_row(
                "SELECT id, name FROM modes WHERE id = ?1",
                params![id],
                mode_from_row,
            )
            .optional()?
            .ok_or_else(|| LogbookError::not_found("mode", id))
    }

    /// All modes ordered by id.
    pub fn list_modes(&self) -> LogbookResult<Vec<Mode>> {
        let mut stmt = self.conn().prepare("SELECT id, name FROM modes ORDER BY id")?;
        let rows = stmt.query_map([], mode_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Renames a mode.
    pub fn rename_mode(&mut self, id: ModeId, name: &str) -> LogbookResult<Mode> {
        let name = require_text("mode name", name)?;
        let mode = self.with_tx(|tx| {
            let changed = tx.execute("UPDATE modes SET name = ?2 WHERE id = ?1", params![id, name])?;
            expect_changed(changed, "mode", id)?;
            Ok(Mode { id, name })
        })?;
        log::info!("renamed mode {} to {}", mode.id, mode.name);
        Ok(mode)
    }

    /// Deletes a mode that no contact references.
    pub fn delete_mode(&mut self, id: ModeId) -> LogbookResult<()> {
        self.with_tx(|tx| {
            ensure_unreferenced(tx, "mode", id, &[("contacts", "mode_id")])?;
            let changed = tx.execute("DELETE FROM modes WHERE id = ?1", params![id])?;
            expect_changed(changed, "mode", id)
        })
        .inspect_err(|err| log::warn!("delete of mode {id} rejected: {err}"))?;
        log::info!("deleted mode {id}");
        Ok(())
    }
}

pub(crate) fn insert_mode(conn: &Connection, name: &str) -> LogbookResult<Mode> {
    let name = require_text("mode name", name)?;
    conn.execute("INSERT INTO modes(name) VALUES (?1)", params![name])?;
    Ok(Mode {
        id: conn.last_insert_rowid(),
        name,
    })
}

fn mode_from_row(row: &Row<'_>) -> rusqlite::Result<Mode> {
    Ok(Mode {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
