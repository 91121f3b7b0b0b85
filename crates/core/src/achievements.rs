//! Achievement trophies awarded from session progress.
//!
//! Milestones are evaluated from the student's completed-session count
//! across all folders. Awarding is idempotent at the database layer, so
//! callers may re-evaluate freely.

use serde::Serialize;

use crate::folder_stats::FolderStats;

/// A trophy definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub code: &'static str,
    pub title: &'static str,
    /// Completed sessions required; `None` for non-count milestones.
    pub threshold: Option<i32>,
}

pub const FOLDER_COMPLETE: &str = "folder_complete";

/// Count-based milestones, ascending by threshold.
pub const SESSION_MILESTONES: &[Milestone] = &[
    Milestone {
        code: "first_session",
        title: "First Session Complete",
        threshold: Some(1),
    },
    Milestone {
        code: "five_sessions",
        title: "Five Sessions Strong",
        threshold: Some(5),
    },
    Milestone {
        code: "ten_sessions",
        title: "Ten Session Star",
        threshold: Some(10),
    },
    Milestone {
        code: "twenty_five_sessions",
        title: "Twenty-Five Session Champion",
        threshold: Some(25),
    },
    Milestone {
        code: "fifty_sessions",
        title: "Fifty Session Legend",
        threshold: Some(50),
    },
];

/// Awarded when every session of a folder is completed.
pub const FOLDER_COMPLETE_MILESTONE: Milestone = Milestone {
    code: FOLDER_COMPLETE,
    title: "Program Finished",
    threshold: None,
};

/// Milestones earned by a student with `completed_total` completed sessions
/// and the given per-folder stats.
pub fn earned(completed_total: i32, folders: &[FolderStats]) -> Vec<Milestone> {
    let mut out: Vec<Milestone> = SESSION_MILESTONES
        .iter()
        .filter(|m| m.threshold.is_some_and(|t| completed_total >= t))
        .copied()
        .collect();

    if folders.iter().any(FolderStats::is_complete) {
        out.push(FOLDER_COMPLETE_MILESTONE);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(total: i32, completed: i32) -> FolderStats {
        FolderStats {
            total_sessions: total,
            completed_sessions: completed,
        }
    }

    #[test]
    fn nothing_earned_without_completions() {
        assert!(earned(0, &[stats(12, 0)]).is_empty());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let codes: Vec<&str> = earned(10, &[]).iter().map(|m| m.code).collect();
        assert_eq!(codes, vec!["first_session", "five_sessions", "ten_sessions"]);
    }

    #[test]
    fn finished_folder_earns_program_trophy() {
        let codes: Vec<&str> = earned(3, &[stats(3, 3), stats(8, 0)])
            .iter()
            .map(|m| m.code)
            .collect();
        assert!(codes.contains(&FOLDER_COMPLETE));
    }

    #[test]
    fn empty_folder_is_not_finished() {
        assert!(!earned(0, &[stats(0, 0)])
            .iter()
            .any(|m| m.code == FOLDER_COMPLETE));
    }
}
