//! `migrate-sessions-to-folders` -- import the legacy document export.
//!
//! Creates students and folders, writes every exported session into its
//! folder (or into a per-student "Legacy Sessions" folder when it has
//! none), resolves the exported `isActive` flags into one active folder per
//! student, and reconciles folder counts. Re-running is safe: rows already
//! imported are recognised by their legacy ID and skipped.
//!
//! # Environment variables
//!
//! | Variable                 | Required | Default | Description                        |
//! |--------------------------|----------|---------|------------------------------------|
//! | `DATABASE_URL`           | yes      | --      | PostgreSQL connection string       |
//! | `LEGACY_EXPORT_PATH`     | yes      | --      | Path to the JSON export            |
//! | `CONFIRM_MIGRATION`      | yes      | --      | Must be `true`                     |
//! | `SESSION_WRITE_DELAY_MS` | no       | `100`   | Pause between session inserts      |

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use speakwell_core::active_folder::{backfill_active_folders, plan_active_folders, FolderActivity};
use speakwell_core::numbering::assign_requested_numbers;
use speakwell_core::types::DbId;
use speakwell_db::models::folder::CreateSessionFolder;
use speakwell_db::models::student::CreateStudent;
use speakwell_db::repositories::{SessionFolderRepo, SessionRepo, StudentRepo};
use speakwell_db::DbPool;
use speakwell_scripts::bootstrap::{self, DEFAULT_WRITE_DELAY_MS};
use speakwell_scripts::legacy::{self, LegacyExport, LegacySession, LEGACY_FOLDER_NAME};

#[derive(Debug, Default)]
struct Summary {
    students_created: usize,
    students_existing: usize,
    folders_created: usize,
    folders_existing: usize,
    sessions_created: usize,
    sessions_skipped: usize,
    active_assigned: usize,
    failed: usize,
}

/// A folder row resolved from the export (or created for orphans).
#[derive(Debug, Clone, Copy)]
struct ImportedFolder {
    id: DbId,
    student_id: DbId,
}

/// One folder's worth of sessions to write, with requested numbers.
struct FolderBatch<'a> {
    folder: ImportedFolder,
    items: Vec<(&'a LegacySession, Option<i32>)>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bootstrap::init("migrate_sessions_to_folders=info,speakwell_scripts=info");
    bootstrap::require_confirmation("migrate-sessions-to-folders")?;

    let path = PathBuf::from(bootstrap::required_var("LEGACY_EXPORT_PATH")?);
    let delay = Duration::from_millis(
        bootstrap::optional_var("SESSION_WRITE_DELAY_MS")?.unwrap_or(DEFAULT_WRITE_DELAY_MS),
    );

    let export = legacy::load_export(&path)?;
    tracing::info!(
        path = %path.display(),
        students = export.students.len(),
        folders = export.folders.len(),
        sessions = export.sessions.len(),
        "Loaded legacy export",
    );

    let pool = bootstrap::connect_database().await?;
    let mut summary = Summary::default();

    let students = import_students(&pool, &export, &mut summary).await;
    let (mut folders, mut activity) = import_folders(&pool, &export, &students, &mut summary).await;

    let batches =
        group_sessions(&pool, &export, &students, &mut folders, &mut activity, &mut summary).await;

    let already: HashSet<String> = SessionRepo::imported_legacy_ids(&pool)
        .await?
        .into_iter()
        .collect();

    let mut touched = BTreeSet::new();
    let mut first_write = true;
    for batch in batches {
        touched.insert(batch.folder.id);
        write_batch(&pool, batch, &already, delay, &mut first_write, &mut summary).await;
    }

    assign_active_folders(&pool, &activity, &mut summary).await?;

    for folder_id in touched {
        if let Err(e) = SessionFolderRepo::recompute_stats(&pool, folder_id).await {
            tracing::error!(folder_id, error = %e, "Failed to reconcile folder");
            summary.failed += 1;
        }
    }

    tracing::info!(
        students_created = summary.students_created,
        students_existing = summary.students_existing,
        folders_created = summary.folders_created,
        folders_existing = summary.folders_existing,
        sessions_created = summary.sessions_created,
        sessions_skipped = summary.sessions_skipped,
        active_assigned = summary.active_assigned,
        failed = summary.failed,
        "Legacy import finished",
    );

    if summary.failed > 0 {
        bail!("{} item(s) failed to import; see the log above", summary.failed);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Students and folders
// ---------------------------------------------------------------------------

async fn import_students(
    pool: &DbPool,
    export: &LegacyExport,
    summary: &mut Summary,
) -> HashMap<String, DbId> {
    let mut ids = HashMap::new();

    for student in &export.students {
        let input = CreateStudent {
            name: student.name.trim().to_string(),
            parent_name: student.parent_name.clone(),
            parent_email: student.parent_email.clone(),
            notes: student.notes.clone(),
        };
        match StudentRepo::upsert_legacy(pool, &student.id, &input).await {
            Ok((row, created)) => {
                if created {
                    summary.students_created += 1;
                } else {
                    summary.students_existing += 1;
                }
                ids.insert(student.id.clone(), row.id);
            }
            Err(e) => {
                tracing::error!(legacy_id = %student.id, error = %e, "Failed to import student");
                summary.failed += 1;
            }
        }
    }

    ids
}

async fn import_folders(
    pool: &DbPool,
    export: &LegacyExport,
    students: &HashMap<String, DbId>,
    summary: &mut Summary,
) -> (HashMap<String, ImportedFolder>, Vec<FolderActivity>) {
    let mut folders = HashMap::new();
    let mut activity = Vec::new();

    for folder in &export.folders {
        let Some(&student_id) = students.get(&folder.student_id) else {
            tracing::warn!(
                legacy_id = %folder.id,
                student = %folder.student_id,
                "Folder references an unknown student, skipping",
            );
            summary.failed += 1;
            continue;
        };

        let input = CreateSessionFolder {
            student_id,
            name: folder.name.trim().to_string(),
            description: folder.description.clone(),
            status_id: None,
            start_date: folder.start_date,
            end_date: folder.end_date,
        };
        match SessionFolderRepo::upsert_legacy(pool, &folder.id, &input).await {
            Ok((row, created)) => {
                if created {
                    summary.folders_created += 1;
                } else {
                    summary.folders_existing += 1;
                }
                activity.push(FolderActivity {
                    folder_id: row.id,
                    student_id,
                    is_active: folder.is_active,
                    created_at: folder.created_at.unwrap_or(row.created_at),
                });
                folders.insert(
                    folder.id.clone(),
                    ImportedFolder {
                        id: row.id,
                        student_id,
                    },
                );
            }
            Err(e) => {
                tracing::error!(legacy_id = %folder.id, error = %e, "Failed to import folder");
                summary.failed += 1;
            }
        }
    }

    (folders, activity)
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Split exported sessions into per-folder batches.
///
/// Sessions whose folder is missing, unknown, or owned by another student
/// go into the student's "Legacy Sessions" folder, numbered by date.
async fn group_sessions<'a>(
    pool: &DbPool,
    export: &'a LegacyExport,
    students: &HashMap<String, DbId>,
    folders: &mut HashMap<String, ImportedFolder>,
    activity: &mut Vec<FolderActivity>,
    summary: &mut Summary,
) -> Vec<FolderBatch<'a>> {
    let mut in_folder: BTreeMap<DbId, (ImportedFolder, Vec<&LegacySession>)> = BTreeMap::new();
    let mut orphans: BTreeMap<&str, Vec<&LegacySession>> = BTreeMap::new();

    for session in &export.sessions {
        let Some(&student_id) = students.get(&session.student_id) else {
            tracing::warn!(
                legacy_id = %session.id,
                student = %session.student_id,
                "Session references an unknown student, skipping",
            );
            summary.failed += 1;
            continue;
        };

        let folder = session
            .folder_id
            .as_ref()
            .and_then(|id| folders.get(id))
            .filter(|f| f.student_id == student_id);

        match folder {
            Some(folder) => in_folder
                .entry(folder.id)
                .or_insert_with(|| (*folder, Vec::new()))
                .1
                .push(session),
            None => orphans
                .entry(session.student_id.as_str())
                .or_default()
                .push(session),
        }
    }

    let mut batches: Vec<FolderBatch<'a>> = in_folder
        .into_values()
        .map(|(folder, mut sessions)| {
            sessions.sort_by_key(|s| s.order_key());
            FolderBatch {
                folder,
                items: sessions.into_iter().map(|s| (s, s.session_number)).collect(),
            }
        })
        .collect();

    for (student_key, sessions) in orphans {
        let Some(&student_id) = students.get(student_key) else {
            continue;
        };
        let folder_key = legacy::legacy_folder_key(student_key);
        let input = CreateSessionFolder {
            student_id,
            name: LEGACY_FOLDER_NAME.to_string(),
            description: Some("Sessions imported without a folder".to_string()),
            status_id: None,
            start_date: sessions.iter().map(|s| s.date).min(),
            end_date: sessions.iter().map(|s| s.date).max(),
        };

        match SessionFolderRepo::upsert_legacy(pool, &folder_key, &input).await {
            Ok((row, created)) => {
                if created {
                    summary.folders_created += 1;
                }
                tracing::info!(
                    folder_id = row.id,
                    student_id,
                    sessions = sessions.len(),
                    "Collecting folder-less sessions",
                );
                activity.push(FolderActivity {
                    folder_id: row.id,
                    student_id,
                    is_active: false,
                    created_at: row.created_at,
                });
                let folder = ImportedFolder {
                    id: row.id,
                    student_id,
                };
                folders.insert(folder_key, folder);

                let requested = legacy::orphan_numbers(&sessions);
                batches.push(FolderBatch {
                    folder,
                    items: sessions.into_iter().zip(requested).collect(),
                });
            }
            Err(e) => {
                tracing::error!(
                    student_id,
                    error = %e,
                    "Failed to create legacy sessions folder",
                );
                summary.failed += sessions.len();
            }
        }
    }

    batches
}

/// Write one folder's sessions sequentially.
///
/// Sessions already imported are skipped. Free requested numbers are kept;
/// collisions are appended after the folder's maximum.
async fn write_batch(
    pool: &DbPool,
    batch: FolderBatch<'_>,
    already: &HashSet<String>,
    delay: Duration,
    first_write: &mut bool,
    summary: &mut Summary,
) {
    let (pending, done): (Vec<_>, Vec<_>) = batch
        .items
        .into_iter()
        .partition(|(s, _)| !already.contains(&s.id));
    summary.sessions_skipped += done.len();
    if pending.is_empty() {
        return;
    }

    let existing = match SessionRepo::numbers_in_folder(pool, batch.folder.id).await {
        Ok(numbers) => numbers,
        Err(e) => {
            tracing::error!(folder_id = batch.folder.id, error = %e, "Failed to read folder numbers");
            summary.failed += pending.len();
            return;
        }
    };
    let requested: Vec<Option<i32>> = pending.iter().map(|(_, n)| *n).collect();
    let numbers = assign_requested_numbers(&existing, &requested);

    for ((session, requested), number) in pending.into_iter().zip(numbers) {
        if !*first_write && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        *first_write = false;

        if requested.is_some_and(|n| n != number) {
            tracing::warn!(
                legacy_id = %session.id,
                requested = requested.unwrap_or_default(),
                assigned = number,
                "Session number collided, appended",
            );
        }

        let input = legacy::to_create_session(session, batch.folder.student_id, batch.folder.id, number);
        match SessionRepo::create_legacy(pool, &input).await {
            Ok(Some(row)) => {
                tracing::debug!(session_id = row.id, legacy_id = %session.id, number, "Session imported");
                summary.sessions_created += 1;
            }
            Ok(None) => summary.sessions_skipped += 1,
            Err(e) if bootstrap::is_unique_violation(&e) => {
                tracing::warn!(legacy_id = %session.id, error = %e, "Session already exists, skipping");
                summary.sessions_skipped += 1;
            }
            Err(e) => {
                tracing::error!(legacy_id = %session.id, error = %e, "Failed to import session");
                summary.failed += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Active folders
// ---------------------------------------------------------------------------

/// Resolve exported `isActive` flags, then give every student with folders
/// but no active one their most recent folder.
async fn assign_active_folders(
    pool: &DbPool,
    activity: &[FolderActivity],
    summary: &mut Summary,
) -> anyhow::Result<()> {
    let plan = plan_active_folders(activity);
    if !plan.deactivate.is_empty() {
        tracing::info!(
            deactivated = plan.deactivate.len(),
            "Resolved students with several active folders",
        );
    }

    let current: Vec<FolderActivity> = SessionFolderRepo::list_activity(pool, None)
        .await?
        .into_iter()
        .map(FolderActivity::from)
        .collect();
    let already_active: HashSet<DbId> = current
        .iter()
        .filter(|f| f.is_active)
        .map(|f| f.folder_id)
        .collect();

    for &(student_id, folder_id) in &plan.keep {
        if already_active.contains(&folder_id) {
            continue;
        }
        set_active(pool, student_id, folder_id, summary).await;
    }

    let current: Vec<FolderActivity> = SessionFolderRepo::list_activity(pool, None)
        .await?
        .into_iter()
        .map(FolderActivity::from)
        .collect();
    for (student_id, folder_id) in backfill_active_folders(&current) {
        set_active(pool, student_id, folder_id, summary).await;
    }

    Ok(())
}

async fn set_active(pool: &DbPool, student_id: DbId, folder_id: DbId, summary: &mut Summary) {
    match StudentRepo::set_active_folder(pool, student_id, folder_id).await {
        Ok(true) => {
            tracing::info!(student_id, folder_id, "Active folder set");
            summary.active_assigned += 1;
        }
        Ok(false) => {
            tracing::warn!(student_id, folder_id, "Active folder not set, ownership mismatch");
            summary.failed += 1;
        }
        Err(e) => {
            tracing::error!(student_id, folder_id, error = %e, "Failed to set active folder");
            summary.failed += 1;
        }
    }
}
