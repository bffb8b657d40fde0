//! Contact normalization and validation rules.

/// Aurora coupling, signal-report bounds, date and frequency checks.
pub mod validate;
