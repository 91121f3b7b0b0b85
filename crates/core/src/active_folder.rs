//! Active-folder invariant: at most one active folder per student.
//!
//! The live schema stores the active folder as `students.active_folder_id`,
//! so the invariant holds by construction for online writes. Data that
//! carries per-folder `is_active` flags (the legacy document export) or a
//! dangling pointer (active folder deleted) is repaired with the planners
//! below. In both cases the most recently created folder wins.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// The activity-relevant slice of a folder row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderActivity {
    pub folder_id: DbId,
    pub student_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// Outcome of [`plan_active_folders`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivationPlan {
    /// `(student_id, folder_id)` of the folder that stays active.
    pub keep: Vec<(DbId, DbId)>,
    /// Folders whose active flag must be cleared.
    pub deactivate: Vec<DbId>,
}

/// Ordering key: newest `created_at`, then highest id.
fn recency(folder: &FolderActivity) -> (Timestamp, DbId) {
    (folder.created_at, folder.folder_id)
}

fn group_by_student(folders: &[FolderActivity]) -> BTreeMap<DbId, Vec<&FolderActivity>> {
    let mut groups: BTreeMap<DbId, Vec<&FolderActivity>> = BTreeMap::new();
    for folder in folders {
        groups.entry(folder.student_id).or_default().push(folder);
    }
    groups
}

/// Resolve multiple active flags per student.
///
/// For each student with more than one active folder, the most recently
/// created one is kept and the rest are deactivated. Students with exactly
/// one active folder keep it; students with none are left without one.
pub fn plan_active_folders(folders: &[FolderActivity]) -> ActivationPlan {
    let mut plan = ActivationPlan::default();

    for (student_id, group) in group_by_student(folders) {
        let mut active: Vec<&FolderActivity> =
            group.into_iter().filter(|f| f.is_active).collect();
        active.sort_by_key(|f| std::cmp::Reverse(recency(f)));

        let mut iter = active.into_iter();
        if let Some(winner) = iter.next() {
            plan.keep.push((student_id, winner.folder_id));
        }
        plan.deactivate.extend(iter.map(|f| f.folder_id));
    }

    plan
}

/// Pick an active folder for every student that has folders but none active.
///
/// Returns `(student_id, folder_id)` pairs to assign. Students that already
/// have an active folder are skipped.
pub fn backfill_active_folders(folders: &[FolderActivity]) -> Vec<(DbId, DbId)> {
    group_by_student(folders)
        .into_iter()
        .filter(|(_, group)| !group.iter().any(|f| f.is_active))
        .filter_map(|(student_id, group)| {
            group
                .into_iter()
                .max_by_key(|f| recency(f))
                .map(|f| (student_id, f.folder_id))
        })
        .collect()
}
