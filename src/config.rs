//! Logbook configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::LogbookResult,
    persist::Logbook,
    probe::{GpsdProbe, ProbeConfig},
};

/// Database location, logging and probe settings.
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// SQLite file path; a `sqlite:///` prefix is accepted and stripped.
    pub database: String,
    /// Log file; `None` logs to stderr.
    pub log_file: Option<PathBuf>,
    /// 0 = warnings, 1 = info, 2 or more = debug.
    pub verbosity: u8,
    /// Location daemon probe.
    pub probe: ProbeConfig,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            database: "logbook.db".to_string(),
            log_file: Some(PathBuf::from("logbook.log")),
            verbosity: 0,
            probe: ProbeConfig::default(),
        }
    }
}

impl LogbookConfig {
    /// Parses a JSON document.
    pub fn from_json_str(raw: &str) -> LogbookResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads a JSON document from disk.
    pub fn load(path: impl AsRef<Path>) -> LogbookResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Database file path with any `sqlite:///` prefix removed.
    pub fn database_path(&self) -> PathBuf {
        let raw = self.database.trim();
        PathBuf::from(raw.strip_prefix("sqlite:///").unwrap_or(raw))
    }

    /// Opens the configured database.
    pub fn open_logbook(&self) -> LogbookResult<Logbook> {
        Logbook::open(self.database_path())
    }

    /// Installs the global logger per `verbosity` and `log_file`.
    pub fn init_logging(&self) -> LogbookResult<()> {
        crate::logging::init(self.verbosity, self.log_file.as_deref())
    }

    /// Builds a probe for the configured daemon.
    pub fn probe(&self) -> GpsdProbe {
        GpsdProbe::new(self.probe.clone())
    }
}
