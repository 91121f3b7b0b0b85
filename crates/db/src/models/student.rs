//! Student entity model and DTOs.

use serde::{Deserialize, Serialize};
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub name: String,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub notes: Option<String>,
    /// The student's single active folder.
    pub active_folder_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 200))]
    pub parent_name: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a student. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub parent_name: Option<String>,
    #[validate(email)]
    pub parent_email: Option<String>,
    pub notes: Option<String>,
}
