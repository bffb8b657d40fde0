//! Shared primitive IDs, signal-report bounds and the continent enum.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LogbookError;

/// Externally assigned country identifier (DXCC entity number).
pub type CountryId = u32;
/// Auto-increment prefix row id.
pub type PrefixId = i64;
/// Auto-increment station row id.
pub type StationId = i64;
/// Auto-increment mode row id.
pub type ModeId = i64;
/// Auto-increment contact row id.
pub type ContactId = i64;

/// Lowest valid readability report.
pub const READABILITY_MIN: i32 = 1;
/// Highest valid readability report.
pub const READABILITY_MAX: i32 = 5;
/// Lowest valid strength report.
pub const STRENGTH_MIN: i32 = 1;
/// Highest valid strength report.
pub const STRENGTH_MAX: i32 = 9;
/// Lowest valid tone report.
pub const TONE_MIN: i32 = 1;
/// Highest valid tone report.
pub const TONE_MAX: i32 = 9;
/// Tone value stored when tone is not reported (aurora contacts).
pub const TONE_NOT_APPLICABLE: i32 = -1;

/// Continent a country belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    /// Africa.
    AF,
    /// Antarctica.
    AN,
    /// Asia.
    AS,
    /// Europe.
    EU,
    /// North America.
    NA,
    /// Oceania.
    OC,
    /// South America.
    SA,
}

impl Continent {
    /// Two-letter code used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Continent::AF => "AF",
            Continent::AN => "AN",
            Continent::AS => "AS",
            Continent::EU => "EU",
            Continent::NA => "NA",
            Continent::OC => "OC",
            Continent::SA => "SA",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Continent {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AF" => Ok(Continent::AF),
            "AN" => Ok(Continent::AN),
            "AS" => Ok(Continent::AS),
            "EU" => Ok(Continent::EU),
            "NA" => Ok(Continent::NA),
            "OC" => Ok(Continent::OC),
            "SA" => Ok(Continent::SA),
            other => Err(LogbookError::Validation(format!(
                "unknown continent code: {other:?}"
            ))),
        }
    }
}
