//! Contact log writes and queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Value};

use crate::{
    core::validate::{CheckedContact, check_contact, next_last_modified},
    error::{LogbookError, LogbookResult},
    qso::{Contact, ContactDraft, ContactFilter, ContactPatch},
    types::{ContactId, ModeId, StationId},
};

use super::{Logbook, decode_timestamp, encode_timestamp, ensure_parent, expect_changed};

const CONTACT_COLUMNS: &str = "id, station_id, mode_id, date, frequency, report_r, report_s, \
     report_t, aurora, qsl_received, qsl_sent, qsl_requested, comment, last_modified";

impl Logbook {
    /// Validates and stores a new contact.
    ///
    /// Station and mode must exist. An aurora contact is stored with
    /// `report_t = -1` whatever tone was submitted.
    pub fn create_contact(&mut self, draft: ContactDraft) -> LogbookResult<Contact> {
        let contact = self
            .with_tx(|tx| {
                let checked = resolve_and_check(tx, draft)?;
                let stamp = next_last_modified(None);
                tx.execute(
                    "INSERT INTO contacts(station_id, mode_id, date, frequency, report_r, report_s,
                         report_t, aurora, qsl_received, qsl_sent, qsl_requested, comment,
                         last_modified)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    params![
                        checked.station_id,
                        checked.mode_id,
                        encode_timestamp(&checked.date),
                        checked.frequency,
                        checked.report_r,
                        checked.report_s,
                        checked.report_t,
                        checked.aurora,
                        checked.qsl_received,
                        checked.qsl_sent,
                        checked.qsl_requested,
                        checked.comment,
                        encode_timestamp(&stamp),
                    ],
                )?;
                Ok(into_contact(tx.last_insert_rowid(), checked, stamp))
            })
            .inspect_err(|err| log::warn!("contact rejected: {err}"))?;
        log::info!(
            "logged contact {} (station {}, {} MHz)",
            contact.id,
            contact.station_id,
            contact.frequency
        );
        Ok(contact)
    }

    /// Applies `patch` over the stored contact and re-runs every check.
    pub fn update_contact(&mut self, id: ContactId, patch: ContactPatch) -> LogbookResult<Contact> {
        let contact = self
            .with_tx(|tx| {
                let current = load_contact(tx, id)?;
                let mut draft = ContactDraft::from(&current);
                patch.apply_to(&mut draft);
                let checked = resolve_and_check(tx, draft)?;
                let stamp = next_last_modified(Some(current.last_modified));
                let changed = tx.execute(
                    "UPDATE contacts SET station_id = ?2, mode_id = ?3, date = ?4, frequency = ?5,
                         report_r = ?6, report_s = ?7, report_t = ?8, aurora = ?9,
                         qsl_received = ?10, qsl_sent = ?11, qsl_requested = ?12, comment = ?13,
                         last_modified = ?14
                     WHERE id = ?1",
                    params![
                        id,
                        checked.station_id,
                        checked.mode_id,
                        encode_timestamp(&checked.date),
                        checked.frequency,
                        checked.report_r,
                        checked.report_s,
                        checked.report_t,
                        checked.aurora,
                        checked.qsl_received,
                        checked.qsl_sent,
                        checked.qsl_requested,
                        checked.comment,
                        encode_timestamp(&stamp),
                    ],
                )?;
                expect_changed(changed, "contact", id)?;
                Ok(into_contact(id, checked, stamp))
            })
            .inspect_err(|err| log::warn!("update of contact {id} rejected: {err}"))?;
        log::info!("updated contact {id}");
        Ok(contact)
    }

    /// Looks up a contact by id.
    pub fn get_contact(&self, id: ContactId) -> LogbookResult<Contact> {
        load_contact(self.conn(), id)
    }

    /// Contacts matching `filter`, ordered by date then id.
    pub fn list_contacts(&self, filter: &ContactFilter) -> LogbookResult<Vec<Contact>> {
        let mut sql = format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE 1 = 1");
        let mut args = Vec::<Value>::new();

        if let Some(v) = filter.station_id {
            sql.push_str(" AND station_id = ?");
            args.push(Value::Integer(v));
        }
        if let Some(v) = filter.mode_id {
            sql.push_str(" AND mode_id = ?");
            args.push(Value::Integer(v));
        }
        if let Some(v) = &filter.since {
            sql.push_str(" AND date >= ?");
            args.push(Value::Text(encode_timestamp(v)));
        }
        if let Some(v) = &filter.until {
            sql.push_str(" AND date < ?");
            args.push(Value::Text(encode_timestamp(v)));
        }
        for (column, value) in [
            ("aurora", filter.aurora),
            ("qsl_received", filter.qsl_received),
            ("qsl_sent", filter.qsl_sent),
            ("qsl_requested", filter.qsl_requested),
        ] {
            if let Some(v) = value {
                sql.push_str(&format!(" AND {column} = ?"));
                args.push(Value::Integer(i64::from(v)));
            }
        }
        sql.push_str(" ORDER BY date ASC, id ASC");
        if let Some(limit) = filter.limit {
            sql.push_str(" LIMIT ?");
            args.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), contact_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Removes a contact.
    pub fn delete_contact(&mut self, id: ContactId) -> LogbookResult<()> {
        self.with_tx(|tx| {
            let changed = tx.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
            expect_changed(changed, "contact", id)
        })?;
        log::info!("deleted contact {id}");
        Ok(())
    }
}

/// Resolves station and mode, then runs the validation engine.
fn resolve_and_check(conn: &Connection, draft: ContactDraft) -> LogbookResult<CheckedContact> {
    resolve_refs(conn, draft.station_id, draft.mode_id)?;
    check_contact(draft)
}

fn resolve_refs(conn: &Connection, station_id: StationId, mode_id: ModeId) -> LogbookResult<()> {
    ensure_parent(conn, "stations", "station", station_id)?;
    ensure_parent(conn, "modes", "mode", mode_id)
}

fn load_contact(conn: &Connection, id: ContactId) -> LogbookResult<Contact> {
    conn.query_row(
        &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
        params![id],
        contact_from_row,
    )
    .optional()?
    .ok_or_else(|| LogbookError::not_found("contact", id))
}

fn into_contact(id: ContactId, checked: CheckedContact, last_modified: DateTime<Utc>) -> Contact {
    Contact {
        id,
        station_id: checked.station_id,
        mode_id: checked.mode_id,
        date: checked.date,
        frequency: checked.frequency,
        report_r: checked.report_r,
        report_s: checked.report_s,
        report_t: checked.report_t,
        aurora: checked.aurora,
        qsl_received: checked.qsl_received,
        qsl_sent: checked.qsl_sent,
        qsl_requested: checked.qsl_requested,
        comment: checked.comment,
        last_modified,
    }
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let date: String = row.get(3)?;
    let last_modified: String = row.get(13)?;
    Ok(Contact {
        id: row.get(0)?,
        station_id: row.get(1)?,
        mode_id: row.get(2)?,
        date: decode_timestamp(3, &date)?,
        frequency: row.get(4)?,
        report_r: row.get(5)?,
        report_s: row.get(6)?,
        report_t: row.get(7)?,
        aurora: row.get(8)?,
        qsl_received: row.get(9)?,
        qsl_sent: row.get(10)?,
        qsl_requested: row.get(11)?,
        comment: row.get(12)?,
        last_modified: decode_timestamp(13, &last_modified)?,
    })
}
