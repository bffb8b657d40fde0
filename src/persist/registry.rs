//! Countries, prefixes and stations.

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::{
    error::{LogbookError, LogbookResult},
    reference::{
        Country, Prefix, PrefixDraft, Station, StationDraft, canonical_callsign,
        normalize_call_part, normalize_suffix, require_text,
    },
    types::{Continent, CountryId, PrefixId, StationId},
};

use super::{Logbook, ensure_parent, ensure_unreferenced, expect_changed};

const COUNTRY_COLUMNS: &str = "id, name, capital, continent";
const PREFIX_COLUMNS: &str = "id, prefix, country_id";
const STATION_COLUMNS: &str = "id, prefix_id, number, suffix";

impl Logbook {
    /// Inserts a country under its externally assigned id.
    pub fn create_country(&mut self, country: Country) -> LogbookResult<Country> {
        let country = self.with_tx(|tx| insert_country(tx, country))?;
        log::info!("created country {} ({})", country.id, country.name);
        Ok(country)
    }

    /// Looks up a country by id.
    pub fn get_country(&self, id: CountryId) -> LogbookResult<Country> {
        self.conn()
            .query_row(
                &format!("SELECT {COUNTRY_COLUMNS} FROM countries WHERE id = ?1"),
                params![id],
                country_from_row,
            )
            .optional()?
            .ok_or_else(|| LogbookError::not_found("country", id))
    }

    /// All countries ordered by id.
    pub fn list_countries(&self) -> LogbookResult<Vec<Country>> {
        let mut stmt = self
            .conn()
            .prepare(&format!("SELECT {COUNTRY_COLUMNS} FROM countries ORDER BY id"))?;
        let rows = stmt.query_map([], country_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Replaces name, capital and continent of an existing country.
    pub fn update_country(&mut self, country: Country) -> LogbookResult<Country> {
        let name = require_text("country name", &country.name)?;
        let capital = country.capital.trim().to_string();
        let country = self.with_tx(|tx| {
            let changed = tx.execute(
                "UPDATE countries SET name = ?2, capital = ?3, continent = ?4 WHERE id = ?1",
                params![country.id, name, capital, country.continent.as_str()],
            )?;
            expect_changed(changed, "country", country.id)?;
            Ok(Country {
                name,
                capital,
                ..country
            })
        })?;
        log::info!("updated country {}", country.id);
        Ok(country)
    }

    /// Deletes a country that no prefix references.
    pub fn delete_country(&mut self, id: CountryId) -> LogbookResult<()> {
        self.with_tx(|tx| {
            ensure_parent_or_not_found(tx, "countries", "country", i64::from(id))?;
            ensure_unreferenced(tx, "country", i64::from(id), &[("prefixes", "country_id")])?;
            tx.execute("DELETE FROM countries WHERE id = ?1", params![id])?;
            Ok(())
        })
        .inspect_err(|err| log::warn!("delete of country {id} rejected: {err}"))?;
        log::info!("deleted country {id}");
        Ok(())
    }

    /// Inserts a prefix for an existing country.
    pub fn create_prefix(&mut self, draft: PrefixDraft) -> LogbookResult<Prefix> {
        let prefix = self
            .with_tx(|tx| insert_prefix(tx, draft))
            .inspect_err(|err| log::warn!("prefix rejected: {err}"))?;
        log::info!("created prefix {} ({})", prefix.id, prefix.prefix);
        Ok(prefix)
    }

    /// Looks up a prefix by id.
    pub fn get_prefix(&self, id: PrefixId) -> LogbookResult<Prefix> {
        get_prefix(self.conn(), id)
    }

    /// Prefixes belonging to `country_id`, ordered by prefix text.
    pub fn prefixes_for_country(&self, country_id: CountryId) -> LogbookResult<Vec<Prefix>> {
        self.get_country(country_id)?;
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PREFIX_COLUMNS} FROM prefixes WHERE country_id = ?1 ORDER BY prefix"
        ))?;
        let rows = stmt.query_map(params![country_id], prefix_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Replaces prefix text and country of an existing prefix.
    pub fn update_prefix(&mut self, prefix: Prefix) -> LogbookResult<Prefix> {
        let text = normalize_call_part("prefix", &prefix.prefix)?;
        let prefix = self
            .with_tx(|tx| {
                ensure_parent(tx, "countries", "country", i64::from(prefix.country_id))?;
                let changed = tx.execute(
                    "UPDATE prefixes SET prefix = ?2, country_id = ?3 WHERE id = ?1",
                    params![prefix.id, text, prefix.country_id],
                )?;
                expect_changed(changed, "prefix", prefix.id)?;
                Ok(Prefix {
                    prefix: text,
                    ..prefix
                })
            })
            .inspect_err(|err| log::warn!("prefix update rejected: {err}"))?;
        log::info!("updated prefix {}", prefix.id);
        Ok(prefix)
    }

    /// Deletes a prefix that no station references.
    pub fn delete_prefix(&mut self, id: PrefixId) -> LogbookResult<()> {
        self.with_tx(|tx| {
            ensure_parent_or_not_found(tx, "prefixes", "prefix", id)?;
            ensure_unreferenced(tx, "prefix", id, &[("stations", "prefix_id")])?;
            tx.execute("DELETE FROM prefixes WHERE id = ?1", params![id])?;
            Ok(())
        })
        .inspect_err(|err| log::warn!("delete of prefix {id} rejected: {err}"))?;
        log::info!("deleted prefix {id}");
        Ok(())
    }

    /// Inserts a station under an existing prefix.
    pub fn create_station(&mut self, draft: StationDraft) -> LogbookResult<Station> {
        let station = self
            .with_tx(|tx| insert_station(tx, draft))
            .inspect_err(|err| log::warn!("station rejected: {err}"))?;
        log::info!("created station {}", station.id);
        Ok(station)
    }

    /// Looks up a station by id.
    pub fn get_station(&self, id: StationId) -> LogbookResult<Station> {
        self.conn()
            .query_row(
                &format!("SELECT {STATION_COLUMNS} FROM stations WHERE id = ?1"),
                params![id],
                station_from_row,
            )
            .optional()?
            .ok_or_else(|| LogbookError::not_found("station", id))
    }

    /// Resolves a station from its canonical callsign (case-insensitive).
    pub fn station_by_callsign(&self, callsign: &str) -> LogbookResult<Station> {
        let call = callsign.trim().to_ascii_uppercase();
        self.conn()
            .query_row(
                "SELECT s.id, s.prefix_id, s.number, s.suffix
                 FROM stations s JOIN prefixes p ON p.id = s.prefix_id
                 WHERE p.prefix || s.number || s.suffix = ?1
                 ORDER BY s.id LIMIT 1",
                params![call],
                station_from_row,
            )
            .optional()?
            .ok_or_else(|| LogbookError::not_found("station", &call))
    }

    /// Canonical callsign of a station.
    pub fn callsign_of(&self, station_id: StationId) -> LogbookResult<String> {
        let station = self.get_station(station_id)?;
        let prefix = self.get_prefix(station.prefix_id)?;
        Ok(canonical_callsign(&prefix.prefix, station.number, &station.suffix))
    }

    /// Replaces prefix, number and suffix of an existing station.
    pub fn update_station(&mut self, station: Station) -> LogbookResult<Station> {
        let suffix = normalize_suffix(&station.suffix)?;
        let station = self
            .with_tx(|tx| {
                ensure_parent(tx, "prefixes", "prefix", station.prefix_id)?;
                let changed = tx.execute(
                    "UPDATE stations SET prefix_id = ?2, number = ?3, suffix = ?4 WHERE id = ?1",
                    params![station.id, station.prefix_id, station.number, suffix],
                )?;
                expect_changed(changed, "station", station.id)?;
                Ok(Station { suffix, ..station })
            })
            .inspect_err(|err| log::warn!("station update rejected: {err}"))?;
        log::info!("updated station {}", station.id);
        Ok(station)
    }

    /// Deletes a station that no contact references.
    pub fn delete_station(&mut self, id: StationId) -> LogbookResult<()> {
        self.with_tx(|tx| {
            ensure_parent_or_not_found(tx, "stations", "station", id)?;
            ensure_unreferenced(tx, "station", id, &[("contacts", "station_id")])?;
            tx.execute("DELETE FROM stations WHERE id = ?1", params![id])?;
            Ok(())
        })
        .inspect_err(|err| log::warn!("delete of station {id} rejected: {err}"))?;
        log::info!("deleted station {id}");
        Ok(())
    }
}

pub(crate) fn insert_country(conn: &Connection, country: Country) -> LogbookResult<Country> {
    let name = require_text("country name", &country.name)?;
    let capital = country.capital.trim().to_string();
    conn.execute(
        "INSERT INTO countries(id, name, capital, continent) VALUES (?1, ?2, ?3, ?4)",
        params![country.id, name, capital, country.continent.as_str()],
    )?;
    Ok(Country {
        name,
        capital,
        ..country
    })
}

pub(crate) fn insert_prefix(conn: &Connection, draft: PrefixDraft) -> LogbookResult<Prefix> {
    let text = normalize_call_part("prefix", &draft.prefix)?;
    ensure_parent(conn, "countries", "country", i64::from(draft.country_id))?;
    conn.execute(
        "INSERT INTO prefixes(prefix, country_id) VALUES (?1, ?2)",
        params![text, draft.country_id],
    )?;
    Ok(Prefix {
        id: conn.last_insert_rowid(),
        prefix: text,
        country_id: draft.country_id,
    })
}

pub(crate) fn insert_station(conn: &Connection, draft: StationDraft) -> LogbookResult<Station> {
    let suffix = normalize_suffix(&draft.suffix)?;
    ensure_parent(conn, "prefixes", "prefix", draft.prefix_id)?;
    conn.execute(
        "INSERT INTO stations(prefix_id, number, suffix) VALUES (?1, ?2, ?3)",
        params![draft.prefix_id, draft.number, suffix],
    )?;
    Ok(Station {
        id: conn.last_insert_rowid(),
        prefix_id: draft.prefix_id,
        number: draft.number,
        suffix,
    })
}

pub(crate) fn get_prefix(conn: &Connection, id: PrefixId) -> LogbookResult<Prefix> {
    conn.query_row(
        &format!("SELECT {PREFIX_COLUMNS} FROM prefixes WHERE id = ?1"),
        params![id],
        prefix_from_row,
    )
    .optional()?
    .ok_or_else(|| LogbookError::not_found("prefix", id))
}

pub(crate) fn prefix_by_text(conn: &Connection, text: &str) -> LogbookResult<Option<Prefix>> {
    Ok(conn
        .query_row(
            &format!("SELECT {PREFIX_COLUMNS} FROM prefixes WHERE prefix = ?1"),
            params![text.trim().to_ascii_uppercase()],
            prefix_from_row,
        )
        .optional()?)
}

// Deleting a missing row is NotFound, not a referential failure.
fn ensure_parent_or_not_found(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: i64,
) -> LogbookResult<()> {
    ensure_parent(conn, table, entity, id).map_err(|err| match err {
        LogbookError::ReferentialIntegrity(_) => LogbookError::not_found(entity, id),
        other => other,
    })
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    let continent: String = row.get(3)?;
    let continent = continent.parse::<Continent>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other(err.to_string())),
        )
    })?;
    Ok(Country {
        id: row.get(0)?,
        name: row.get(1)?,
        capital: row.get(2)?,
        continent,
    })
}

fn prefix_from_row(row: &Row<'_>) -> rusqlite::Result<Prefix> {
    Ok(Prefix {
        id: row.get(0)?,
        prefix: row.get(1)?,
        country_id: row.get(2)?,
    })
}

fn station_from_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get(0)?,
        prefix_id: row.get(1)?,
        number: row.get(2)?,
        suffix: row.get(3)?,
    })
}
