//! `fix-active-folders` -- repair students' active-folder pointers.
//!
//! Clears pointers that reference a folder owned by another student, then
//! points every student who has folders but no active one at their most
//! recently created folder.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default | Description                          |
//! |---------------------|----------|---------|--------------------------------------|
//! | `DATABASE_URL`      | yes      | --      | PostgreSQL connection string         |
//! | `CONFIRM_MIGRATION` | yes      | --      | Must be `true`                       |
//! | `STUDENT_ID`        | no       | all     | Limit the repair to one student      |

use anyhow::bail;
use speakwell_core::active_folder::{backfill_active_folders, FolderActivity};
use speakwell_core::types::DbId;
use speakwell_db::repositories::{SessionFolderRepo, StudentRepo};
use speakwell_scripts::bootstrap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init("fix_active_folders=info,speakwell_scripts=info");
    bootstrap::require_confirmation("fix-active-folders")?;

    let scope: Option<DbId> = bootstrap::optional_var("STUDENT_ID")?;
    let pool = bootstrap::connect_database().await?;

    match scope {
        Some(student_id) => tracing::info!(student_id, "Repairing one student"),
        None => tracing::info!("Repairing all students"),
    }

    let cleared = StudentRepo::clear_foreign_active_folders(&pool, scope).await?;
    if cleared > 0 {
        tracing::warn!(cleared, "Cleared pointers to folders owned by another student");
    }

    let folders: Vec<FolderActivity> = SessionFolderRepo::list_activity(&pool, scope)
        .await?
        .into_iter()
        .map(FolderActivity::from)
        .collect();
    let assignments = backfill_active_folders(&folders);

    let mut assigned = 0usize;
    let mut failed = 0usize;
    for (student_id, folder_id) in assignments {
        match StudentRepo::set_active_folder(&pool, student_id, folder_id).await {
            Ok(true) => {
                tracing::info!(student_id, folder_id, "Active folder assigned");
                assigned += 1;
            }
            Ok(false) => {
                tracing::warn!(student_id, folder_id, "Folder no longer owned by student");
                failed += 1;
            }
            Err(e) => {
                tracing::error!(student_id, folder_id, error = %e, "Failed to assign active folder");
                failed += 1;
            }
        }
    }

    tracing::info!(
        folders = folders.len(),
        cleared,
        assigned,
        failed,
        "Active folder repair finished",
    );

    if failed > 0 {
        bail!("{failed} student(s) could not be repaired");
    }
    Ok(())
}
