//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod achievement;
pub mod folder;
pub mod material;
pub mod message;
pub mod session;
pub mod status;
pub mod student;
