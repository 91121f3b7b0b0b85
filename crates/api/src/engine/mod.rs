//! Session engine.
//!
//! Contains the folder generator that writes a planned batch of sessions,
//! plus the progress handler that applies the side effects of a session
//! status change (unlocking, stats reconciliation, achievements).

pub mod generation;
pub mod progress;
