//! Reference records: countries, callsign prefixes, stations and modes.

use serde::{Deserialize, Serialize};

use crate::{
    error::{LogbookError, LogbookResult},
    types::{Continent, CountryId, ModeId, PrefixId, StationId},
};

/// DXCC country entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Externally assigned entity number.
    pub id: CountryId,
    /// Country name.
    pub name: String,
    /// Capital city.
    pub capital: String,
    /// Continent.
    pub continent: Continent,
}

/// Callsign prefix tied to one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    /// Row id.
    pub id: PrefixId,
    /// Upper-case prefix text, e.g. `DL`.
    pub prefix: String,
    /// Owning country.
    pub country_id: CountryId,
}

/// Insert payload for a [`Prefix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixDraft {
    /// Prefix text; normalised to upper case on write.
    pub prefix: String,
    /// Owning country.
    pub country_id: CountryId,
}

/// Station identified by prefix, number and suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Row id.
    pub id: StationId,
    /// Owning prefix.
    pub prefix_id: PrefixId,
    /// Call area digit(s).
    pub number: u16,
    /// Upper-case suffix text.
    pub suffix: String,
}

/// Insert payload for a [`Station`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationDraft {
    /// Owning prefix.
    pub prefix_id: PrefixId,
    /// Call area digit(s).
    pub number: u16,
    /// Suffix text; normalised to upper case on write.
    pub suffix: String,
}

/// Transmission mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    /// Row id.
    pub id: ModeId,
    /// Display name, e.g. `CW`.
    pub name: String,
}

/// Builds the canonical callsign `prefix + number + suffix`.
pub fn canonical_callsign(prefix: &str, number: u16, suffix: &str) -> String {
    format!(
        "{}{}{}",
        prefix.trim().to_ascii_uppercase(),
        number,
        suffix.trim().to_ascii_uppercase()
    )
}

pub(crate) fn normalize_call_part(field: &str, value: &str) -> LogbookResult<String> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(LogbookError::Validation(format!(
            "{field} must be non-empty ASCII alphanumeric, got {value:?}"
        )));
    }
    Ok(value.to_ascii_uppercase())
}

// A leading digit would fold into the station number once the callsign is
// concatenated, so `DL`+1+`2ABC` and `DL`+12+`ABC` could not be told apart.
pub(crate) fn normalize_suffix(value: &str) -> LogbookResult<String> {
    let suffix = normalize_call_part("suffix", value)?;
    if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(LogbookError::Validation(format!(
            "suffix must not start with a digit, got {suffix:?}"
        )));
    }
    Ok(suffix)
}

pub(crate) fn require_text(field: &str, value: &str) -> LogbookResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LogbookError::Validation(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}
