//! Contact (QSO) record, create payload, sparse patch and list filter.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ContactId, ModeId, StationId};

/// Persisted contact row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Row id.
    pub id: ContactId,
    /// Worked station.
    pub station_id: StationId,
    /// Transmission mode.
    pub mode_id: ModeId,
    /// Contact time, normalised to UTC.
    pub date: DateTime<Utc>,
    /// Frequency in MHz.
    pub frequency: f64,
    /// Readability report.
    pub report_r: i32,
    /// Strength report.
    pub report_s: i32,
    /// Tone report, `-1` when not applicable.
    pub report_t: i32,
    /// Aurora propagation.
    pub aurora: bool,
    /// QSL card received.
    pub qsl_received: bool,
    /// QSL card sent.
    pub qsl_sent: bool,
    /// QSL card requested.
    pub qsl_requested: bool,
    /// Free text.
    pub comment: String,
    /// Set by the logbook on every successful write.
    pub last_modified: DateTime<Utc>,
}

/// Create payload for a [`Contact`].
///
/// `date` is RFC 3339 text and must carry an explicit offset (`Z` or
/// `+hh:mm`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    /// Worked station.
    pub station_id: StationId,
    /// Transmission mode.
    pub mode_id: ModeId,
    /// Contact time with offset.
    pub date: String,
    /// Frequency in MHz.
    pub frequency: f64,
    /// Readability report.
    pub report_r: i32,
    /// Strength report.
    pub report_s: i32,
    /// Tone report; ignored when `aurora` is set.
    pub report_t: i32,
    /// Aurora propagation.
    #[serde(default)]
    pub aurora: bool,
    /// QSL card received.
    #[serde(default)]
    pub qsl_received: bool,
    /// QSL card sent.
    #[serde(default)]
    pub qsl_sent: bool,
    /// QSL card requested.
    #[serde(default)]
    pub qsl_requested: bool,
    /// Free text.
    #[serde(default)]
    pub comment: String,
}

impl From<&Contact> for ContactDraft {
    fn from(rec: &Contact) -> Self {
        Self {
            station_id: rec.station_id,
            mode_id: rec.mode_id,
            date: rec.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            frequency: rec.frequency,
            report_r: rec.report_r,
            report_s: rec.report_s,
            report_t: rec.report_t,
            aurora: rec.aurora,
            qsl_received: rec.qsl_received,
            qsl_sent: rec.qsl_sent,
            qsl_requested: rec.qsl_requested,
            comment: rec.comment.clone(),
        }
    }
}

/// Sparse patch where each `Some` field overwrites the stored value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContactPatch {
    /// Optional replacement station.
    pub station_id: Option<StationId>,
    /// Optional replacement mode.
    pub mode_id: Option<ModeId>,
    /// Optional replacement date (RFC 3339 with offset).
    pub date: Option<String>,
    /// Optional replacement frequency.
    pub frequency: Option<f64>,
    /// Optional replacement readability.
    pub report_r: Option<i32>,
    /// Optional replacement strength.
    pub report_s: Option<i32>,
    /// Optional replacement tone.
    pub report_t: Option<i32>,
    /// Optional replacement aurora flag.
    pub aurora: Option<bool>,
    /// Optional replacement QSL received flag.
    pub qsl_received: Option<bool>,
    /// Optional replacement QSL sent flag.
    pub qsl_sent: Option<bool>,
    /// Optional replacement QSL requested flag.
    pub qsl_requested: Option<bool>,
    /// Optional replacement comment.
    pub comment: Option<String>,
}

impl ContactPatch {
    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies this patch in place to a candidate draft.
    pub fn apply_to(&self, draft: &mut ContactDraft) {
        if let Some(v) = self.station_id {
            draft.station_id = v;
        }
        if let Some(v) = self.mode_id {
            draft.mode_id = v;
        }
        if let Some(v) = &self.date {
            draft.date = v.clone();
        }
        if let Some(v) = self.frequency {
            draft.frequency = v;
        }
        if let Some(v) = self.report_r {
            draft.report_r = v;
        }
        if let Some(v) = self.report_s {
            draft.report_s = v;
        }
        if let Some(v) = self.report_t {
            draft.report_t = v;
        }
        if let Some(v) = self.aurora {
            draft.aurora = v;
        }
        if let Some(v) = self.qsl_received {
            draft.qsl_received = v;
        }
        if let Some(v) = self.qsl_sent {
            draft.qsl_sent = v;
        }
        if let Some(v) = self.qsl_requested {
            draft.qsl_requested = v;
        }
        if let Some(v) = &self.comment {
            draft.comment = v.clone();
        }
    }
}

/// Query filter for listing contacts. Unset fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactFilter {
    /// Only contacts with this station.
    pub station_id: Option<StationId>,
    /// Only contacts in this mode.
    pub mode_id: Option<ModeId>,
    /// Inclusive lower bound on `date`.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `date`.
    pub until: Option<DateTime<Utc>>,
    /// Only contacts with this aurora flag.
    pub aurora: Option<bool>,
    /// Only contacts with this QSL received flag.
    pub qsl_received: Option<bool>,
    /// Only contacts with this QSL sent flag.
    pub qsl_sent: Option<bool>,
    /// Only contacts with this QSL requested flag.
    pub qsl_requested: Option<bool>,
    /// Maximum number of rows returned.
    pub limit: Option<usize>,
}
