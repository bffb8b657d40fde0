//! Bulk reference-data import.
//!
//! A [`ReferenceData`] document is loaded in one transaction: if any row
//! fails (unknown country, unknown prefix, malformed callsign part) nothing
//! from the document is kept.

use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{LogbookError, LogbookResult},
    persist::{
        Logbook,
        modes::insert_mode,
        registry::{insert_country, insert_prefix, insert_station, prefix_by_text},
    },
    reference::{Country, PrefixDraft, StationDraft},
    types::PrefixId,
};

/// Station row keyed by prefix text rather than prefix id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationImport {
    /// Prefix text, e.g. `DL`.
    pub prefix: String,
    /// Call area digit(s).
    pub number: u16,
    /// Suffix text.
    pub suffix: String,
}

/// Reference rows to load into an empty or partially populated logbook.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Countries with their assigned ids.
    #[serde(default)]
    pub countries: Vec<Country>,
    /// Prefixes referring to countries by id.
    #[serde(default)]
    pub prefixes: Vec<PrefixDraft>,
    /// Stations referring to prefixes by text.
    #[serde(default)]
    pub stations: Vec<StationImport>,
    /// Mode names.
    #[serde(default)]
    pub modes: Vec<String>,
}

impl ReferenceData {
    /// Parses a JSON document.
    pub fn from_json_str(raw: &str) -> LogbookResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON document from disk.
    pub fn load(path: impl AsRef<Path>) -> LogbookResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

/// Rows created by an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Countries inserted.
    pub countries: usize,
    /// Prefixes inserted.
    pub prefixes: usize,
    /// Stations inserted.
    pub stations: usize,
    /// Modes inserted.
    pub modes: usize,
}

impl Logbook {
    /// Loads `data` atomically, resolving station prefixes by text against
    /// both existing rows and prefixes from the same document.
    pub fn import_reference(&mut self, data: &ReferenceData) -> LogbookResult<ImportSummary> {
        let summary = self
            .with_tx(|tx| {
                let mut summary = ImportSummary::default();
                for country in &data.countries {
                    insert_country(tx, country.clone())?;
                    summary.countries += 1;
                }

                let mut prefix_ids = HashMap::<String, PrefixId>::new();
                for draft in &data.prefixes {
                    let prefix = insert_prefix(tx, draft.clone())?;
                    prefix_ids.insert(prefix.prefix, prefix.id);
                    summary.prefixes += 1;
                }

                for station in &data.stations {
                    let key = station.prefix.trim().to_ascii_uppercase();
                    let prefix_id = if let Some(id) = prefix_ids.get(&key).copied() {
                        id
                    } else {
                        let prefix = prefix_by_text(tx, &key)?.ok_or_else(|| {
                            LogbookError::ReferentialIntegrity(format!(
                                "prefix {key:?} does not exist"
                            ))
                        })?;
                        prefix_ids.insert(key, prefix.id);
                        prefix.id
                    };
                    insert_station(
                        tx,
                        StationDraft {
                            prefix_id,
                            number: station.number,
                            suffix: station.suffix.clone(),
                        },
                    )?;
                    summary.stations += 1;
                }

                for name in &data.modes {
                    insert_mode(tx, name)?;
                    summary.modes += 1;
                }
                Ok(summary)
            })
            .inspect_err(|err| log::warn!("reference import rolled back: {err}"))?;
        log::info!(
            "imported {} countries, {} prefixes, {} stations, {} modes",
            summary.countries,
            summary.prefixes,
            summary.stations,
            summary.modes
        );
        Ok(summary)
    }
}
