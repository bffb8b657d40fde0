//! Single-writer async access to a [`crate::persist::Logbook`].

/// Event stream types emitted by the runtime.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
