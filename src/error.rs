//! Error kinds returned by logbook operations.

use thiserror::Error;

/// Errors surfaced by registry, mode and contact operations.
#[derive(Debug, Error)]
pub enum LogbookError {
    /// A field is out of bounds, missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A referenced row is missing, or a delete is blocked by dependants.
    #[error("referential integrity violated: {0}")]
    ReferentialIntegrity(String),
    /// Lookup by id found no row.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind, e.g. `"contact"`.
        entity: &'static str,
        /// Requested id, rendered as text.
        id: String,
    },
    /// Underlying SQLite failure.
    #[error("storage error: {0}")]
    Storage(rusqlite::Error),
    /// JSON encode/decode failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// File system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogbookError {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for LogbookError {
    fn from(value: rusqlite::Error) -> Self {
        // Foreign keys are checked explicitly before every write; this only
        // catches violations that slip past those checks.
        if let rusqlite::Error::SqliteFailure(err, msg) = &value {
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                return Self::ReferentialIntegrity(
                    msg.clone()
                        .unwrap_or_else(|| "foreign key constraint failed".to_string()),
                );
            }
        }
        Self::Storage(value)
    }
}

/// Result alias for logbook operations.
pub type LogbookResult<T> = Result<T, LogbookError>;
