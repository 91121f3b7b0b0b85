//! Session status constants and state machine.
//!
//! Status IDs match the `session_statuses` seed data (1-based SMALLSERIAL).
//! The db crate exposes the same values as the `SessionStatus` enum; they are
//! repeated here because `core` has no internal deps.

/// Session not yet reachable by the student.
pub const LOCKED: i16 = 1;

/// Session unlocked and ready to be held.
pub const AVAILABLE: i16 = 2;

/// Session held and signed off by the therapist.
pub const COMPLETED: i16 = 3;

/// Session cancelled; may be reopened.
pub const CANCELLED: i16 = 4;

/// Folder status IDs matching `folder_statuses` seed data.
pub mod folder {
    pub const ACTIVE: i16 = 1;
    pub const COMPLETED: i16 = 2;
    pub const PAUSED: i16 = 3;

    /// Check that `id` is a known folder status.
    pub fn is_valid(id: i16) -> bool {
        matches!(id, ACTIVE | COMPLETED | PAUSED)
    }
}

/// Returns the set of status IDs reachable from `from_status`.
///
/// `Completed` is terminal. Unknown statuses have no transitions.
pub fn valid_transitions(from_status: i16) -> &'static [i16] {
    match from_status {
        // Locked -> Available, Cancelled
        LOCKED => &[AVAILABLE, CANCELLED],
        // Available -> Completed, Cancelled, Locked
        AVAILABLE => &[COMPLETED, CANCELLED, LOCKED],
        // Cancelled -> Available
        CANCELLED => &[AVAILABLE],
        COMPLETED => &[],
        _ => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: i16, to: i16) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a state transition, returning an error message for invalid ones.
pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(format!(
            "Invalid session transition: {} ({from}) -> {} ({to})",
            status_name(from),
            status_name(to)
        ))
    }
}

/// Human-readable name for a session status ID.
pub fn status_name(id: i16) -> &'static str {
    match id {
        LOCKED => "Locked",
        AVAILABLE => "Available",
        COMPLETED => "Completed",
        CANCELLED => "Cancelled",
        _ => "Unknown",
    }
}

/// Parse a status name (case-insensitive; `canceled` is accepted).
pub fn from_name(name: &str) -> Option<i16> {
    match name.trim().to_ascii_lowercase().as_str() {
        "locked" => Some(LOCKED),
        "available" => Some(AVAILABLE),
        "completed" => Some(COMPLETED),
        "cancelled" | "canceled" => Some(CANCELLED),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_can_be_unlocked_or_cancelled() {
        assert!(can_transition(LOCKED, AVAILABLE));
        assert!(can_transition(LOCKED, CANCELLED));
        assert!(!can_transition(LOCKED, COMPLETED));
    }

    #[test]
    fn available_can_complete() {
        assert!(can_transition(AVAILABLE, COMPLETED));
        assert!(can_transition(AVAILABLE, LOCKED));
    }

    #[test]
    fn cancelled_can_only_reopen() {
        assert_eq!(valid_transitions(CANCELLED), &[AVAILABLE]);
    }

    #[test]
    fn completed_is_terminal() {
        for to in [LOCKED, AVAILABLE, CANCELLED, COMPLETED] {
            assert!(!can_transition(COMPLETED, to));
        }
    }

    #[test]
    fn unknown_status_has_no_transitions() {
        assert!(valid_transitions(99).is_empty());
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = validate_transition(COMPLETED, LOCKED).unwrap_err();
        assert!(err.contains("Completed (3)"));
        assert!(err.contains("Locked (1)"));
    }

    #[test]
    fn legacy_names_parse_case_insensitively() {
        assert_eq!(from_name("Completed"), Some(COMPLETED));
        assert_eq!(from_name("canceled"), Some(CANCELLED));
        assert_eq!(from_name("unknown"), None);
    }

    #[test]
    fn folder_status_ids() {
        assert!(folder::is_valid(folder::PAUSED));
        assert!(!folder::is_valid(0));
    }
}
