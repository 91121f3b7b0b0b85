//! Folder statistics.
//!
//! A folder's `total_sessions` / `completed_sessions` are a cache over its
//! session rows. They may drift whenever sessions change without a
//! follow-up reconciliation; recomputing from the rows is authoritative.

use serde::Serialize;

/// Cached aggregate counts of one folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FolderStats {
    pub total_sessions: i32,
    pub completed_sessions: i32,
}

impl FolderStats {
    /// Whether every session of a non-empty folder is completed.
    pub fn is_complete(&self) -> bool {
        self.total_sessions > 0 && self.completed_sessions == self.total_sessions
    }
}
