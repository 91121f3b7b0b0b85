//! `reconcile-folder-stats` -- recompute cached session counts on every folder.
//!
//! Safe to run at any time; each folder is updated in one statement from
//! the live session rows.
//!
//! # Environment variables
//!
//! | Variable       | Required | Default | Description                  |
//! |----------------|----------|---------|------------------------------|
//! | `DATABASE_URL` | yes      | --      | PostgreSQL connection string |

use anyhow::bail;
use speakwell_db::repositories::SessionFolderRepo;
use speakwell_scripts::bootstrap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init("reconcile_folder_stats=info,speakwell_scripts=info");

    let pool = bootstrap::connect_database().await?;
    let ids = SessionFolderRepo::list_ids(&pool).await?;
    tracing::info!(folders = ids.len(), "Reconciling folder stats");

    let mut updated = 0usize;
    let mut failed = 0usize;
    for id in ids {
        match SessionFolderRepo::recompute_stats(&pool, id).await {
            Ok(Some(folder)) => {
                tracing::debug!(
                    folder_id = id,
                    total = folder.total_sessions,
                    completed = folder.completed_sessions,
                    "Folder reconciled",
                );
                updated += 1;
            }
            // Deleted since the id list was read.
            Ok(None) => {}
            Err(e) => {
                tracing::error!(folder_id = id, error = %e, "Failed to reconcile folder");
                failed += 1;
            }
        }
    }

    tracing::info!(updated, failed, "Folder stats reconciliation finished");

    if failed > 0 {
        bail!("{failed} folder(s) could not be reconciled");
    }
    Ok(())
}
