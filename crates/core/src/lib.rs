//! Domain logic for the Speakwell practice backend.
//!
//! Has no internal deps so the API, the scripts, and tests can share it.

pub mod achievements;
pub mod active_folder;
pub mod batch;
pub mod error;
pub mod folder_schedule;
pub mod folder_stats;
pub mod hashing;
pub mod materials;
pub mod messages;
pub mod numbering;
pub mod session_status;
pub mod types;
