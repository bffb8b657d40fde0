//! Validation engine applied to every contact write.
//!
//! Order matters: the aurora coupling rewrites the tone report before the
//! range checks run, so an aurora contact never fails on its submitted tone.

use chrono::{DateTime, Utc};

use crate::{
    error::{LogbookError, LogbookResult},
    qso::ContactDraft,
    types::{
        ModeId, READABILITY_MAX, READABILITY_MIN, STRENGTH_MAX, STRENGTH_MIN, StationId,
        TONE_MAX, TONE_MIN, TONE_NOT_APPLICABLE,
    },
};

/// Contact fields after coupling and validation, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedContact {
    /// Worked station.
    pub station_id: StationId,
    /// Transmission mode.
    pub mode_id: ModeId,
    /// Contact time in UTC.
    pub date: DateTime<Utc>,
    /// Frequency in MHz.
    pub frequency: f64,
    /// Readability report.
    pub report_r: i32,
    /// Strength report.
    pub report_s: i32,
    /// Tone report after coupling.
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
}

/// Returns the tone to store: `-1` for aurora contacts, otherwise `tone`.
pub fn apply_aurora_coupling(aurora: bool, tone: i32) -> i32 {
    if aurora { TONE_NOT_APPLICABLE } else { tone }
}

/// Checks R, S and T against their bounds. `T = -1` always passes.
pub fn validate_signal_report(r: i32, s: i32, t: i32) -> LogbookResult<()> {
    if !(READABILITY_MIN..=READABILITY_MAX).contains(&r) {
        return Err(LogbookError::Validation(format!(
            "readability {r} outside {READABILITY_MIN}..={READABILITY_MAX}"
        )));
    }
    if !(STRENGTH_MIN..=STRENGTH_MAX).contains(&s) {
        return Err(LogbookError::Validation(format!(
            "strength {s} outside {STRENGTH_MIN}..={STRENGTH_MAX}"
        )));
    }
    if t != TONE_NOT_APPLICABLE && !(TONE_MIN..=TONE_MAX).contains(&t) {
        return Err(LogbookError::Validation(format!(
            "tone {t} outside {TONE_MIN}..={TONE_MAX} and not {TONE_NOT_APPLICABLE}"
        )));
    }
    Ok(())
}

/// Parses an RFC 3339 timestamp. Input without an offset is rejected.
pub fn parse_contact_date(raw: &str) -> LogbookResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| {
            LogbookError::Validation(format!(
                "date {raw:?} is not an RFC 3339 timestamp with offset: {err}"
            ))
        })
}

/// Rejects non-finite and non-positive frequencies.
pub fn validate_frequency(mhz: f64) -> LogbookResult<()> {
    if !mhz.is_finite() || mhz <= 0.0 {
        return Err(LogbookError::Validation(format!(
            "frequency {mhz} MHz must be a positive number"
        )));
    }
    Ok(())
}

/// Next `last_modified` stamp; never earlier than `previous`.
pub fn next_last_modified(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if prev > now => prev,
        _ => now,
    }
}

/// Runs coupling then every field check on a candidate draft.
///
/// Referential checks need the database and happen before this is called.
pub fn check_contact(draft: ContactDraft) -> LogbookResult<CheckedContact> {
    let report_t = apply_aurora_coupling(draft.aurora, draft.report_t);
    validate_signal_report(draft.report_r, draft.report_s, report_t)?;
    let date = parse_contact_date(&draft.date)?;
    validate_frequency(draft.frequency)?;

    Ok(CheckedContact {
        station_id: draft.station_id,
        mode_id: draft.mode_id,
        date,
        frequency: draft.frequency,
        report_r: draft.report_r,
        report_s: draft.report_s,
        report_t,
        aurora: draft.aurora,
        qsl_received: draft.qsl_received,
        qsl_sent: draft.qsl_sent,
        qsl_requested: draft.qsl_requested,
        comment: draft.comment,
    })
}
