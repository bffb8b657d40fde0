//! Location-daemon reachability probe.
//!
//! Contact logging never depends on this module; it only answers "is the
//! daemon there". Failures are classified internally and collapsed to
//! `false` at the public boundary.

/// gpsd-style TCP probe.
pub mod gpsd;

pub use gpsd::{GpsdProbe, ProbeConfig, ProbeFailure};

/// Narrow reachability capability consumed by the logbook.
pub trait StatusProbe: Send {
    /// Opens a session with the daemon. Returns `false` on any failure.
    fn connect(&mut self) -> bool;
    /// Closes the session, if any.
    fn disconnect(&mut self);
    /// Attempts a fresh connection and reports whether the daemon answered.
    fn check_running(&mut self) -> bool;
}
