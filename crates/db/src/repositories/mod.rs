//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod achievement_repo;
pub mod folder_repo;
pub mod material_repo;
pub mod message_repo;
pub mod session_repo;
pub mod student_repo;

pub use achievement_repo::AchievementRepo;
pub use folder_repo::SessionFolderRepo;
pub use material_repo::SessionMaterialRepo;
pub use message_repo::MessageRepo;
pub use session_repo::SessionRepo;
pub use student_repo::StudentRepo;
