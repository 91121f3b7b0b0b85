//! Per-folder session numbering helpers.
//!
//! Stored session numbers are not renumbered when a session is deleted, so
//! a folder may contain gaps. [`contiguous_view`] derives a gap-free rank
//! for display without touching stored values.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// A stored session number paired with its derived contiguous position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedSession {
    pub session_id: DbId,
    pub session_number: i32,
    pub position: i32,
}

/// Rank sessions by `(session_number, created_at, id)` and assign positions 1..=n.
pub fn contiguous_view(sessions: &[(DbId, i32, Timestamp)]) -> Vec<RankedSession> {
    let mut sorted: Vec<&(DbId, i32, Timestamp)> = sessions.iter().collect();
    sorted.sort_by_key(|(id, number, created_at)| (*number, *created_at, *id));
    sorted
        .into_iter()
        .zip(1..)
        .map(|(&(session_id, session_number, _), position)| RankedSession {
            session_id,
            session_number,
            position,
        })
        .collect()
}

/// Number items chronologically: by date, then creation time, then input order.
///
/// Returns the 1-based number of each input, in input order.
pub fn sequence_by_date(keys: &[(NaiveDate, Timestamp)]) -> Vec<i32> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by_key(|&i| (keys[i].0, keys[i].1, i));

    let mut numbers = vec![0; keys.len()];
    for (rank, idx) in order.into_iter().enumerate() {
        numbers[idx] = rank as i32 + 1;
    }
    numbers
}

/// Hands out session numbers within one folder without collisions.
#[derive(Debug, Clone, Default)]
pub struct NumberAllocator {
    used: BTreeSet<i32>,
}

impl NumberAllocator {
    /// Start from the numbers already present in the folder.
    pub fn with_existing<I: IntoIterator<Item = i32>>(numbers: I) -> Self {
        Self {
            used: numbers.into_iter().collect(),
        }
    }

    /// Keep `requested` when it is positive and free, otherwise append after
    /// the current maximum.
    pub fn claim(&mut self, requested: Option<i32>) -> i32 {
        match requested {
            Some(n) if self.try_claim(n) => n,
            _ => {
                let number = self.next_free();
                self.used.insert(number);
                number
            }
        }
    }

    /// Claim `number` only if it is positive and free.
    pub fn try_claim(&mut self, number: i32) -> bool {
        number >= 1 && self.used.insert(number)
    }

    fn next_free(&self) -> i32 {
        self.used.last().map_or(1, |max| max + 1)
    }
}

/// Assign numbers for a batch of sessions entering a folder that already
/// holds `existing`.
///
/// Every free requested number is honored first, so a duplicate never takes
/// the number of a later, non-colliding request. Collisions and missing
/// numbers are then appended after the maximum, in ascending request order.
/// Returns one number per request, in input order.
pub fn assign_requested_numbers(existing: &[i32], requested: &[Option<i32>]) -> Vec<i32> {
    let mut order: Vec<usize> = (0..requested.len()).collect();
    order.sort_by_key(|&i| (requested[i].is_none(), requested[i], i));

    let mut allocator = NumberAllocator::with_existing(existing.iter().copied());
    let mut numbers: Vec<Option<i32>> = vec![None; requested.len()];

    for &i in &order {
        if let Some(n) = requested[i] {
            if allocator.try_claim(n) {
                numbers[i] = Some(n);
            }
        }
    }
    for &i in &order {
        if numbers[i].is_none() {
            numbers[i] = Some(allocator.claim(None));
        }
    }

    numbers.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn ts(hour: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 2, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn contiguous_view_closes_gaps() {
        let sessions = vec![(30, 6, ts(3)), (10, 1, ts(1)), (20, 3, ts(2))];
        let view = contiguous_view(&sessions);
        let positions: Vec<(DbId, i32, i32)> = view
            .iter()
            .map(|r| (r.session_id, r.session_number, r.position))
            .collect();
        assert_eq!(positions, vec![(10, 1, 1), (20, 3, 2), (30, 6, 3)]);
    }

    #[test]
    fn sequence_by_date_orders_chronologically() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 1, day).unwrap();
        let keys = vec![(d(20), ts(1)), (d(3), ts(5)), (d(3), ts(2)), (d(10), ts(1))];
        assert_eq!(sequence_by_date(&keys), vec![4, 2, 1, 3]);
    }

    #[test]
    fn allocator_keeps_free_numbers_and_appends_collisions() {
        let mut alloc = NumberAllocator::with_existing([1, 2, 5]);
        assert_eq!(alloc.claim(Some(3)), 3);
        assert_eq!(alloc.claim(Some(2)), 6);
        assert_eq!(alloc.claim(None), 7);
        assert_eq!(alloc.claim(Some(0)), 8);
    }

    #[test]
    fn allocator_starts_at_one_for_empty_folder() {
        let mut alloc = NumberAllocator::default();
        assert_eq!(alloc.claim(None), 1);
        assert_eq!(alloc.claim(None), 2);
    }

    #[test]
    fn requested_numbers_win_over_earlier_duplicates() {
        let numbers =
            assign_requested_numbers(&[1, 2], &[Some(2), Some(3), None, Some(3)]);
        assert_eq!(numbers, vec![4, 3, 6, 5]);
    }

    #[test]
    fn fresh_folder_keeps_every_requested_number() {
        let numbers = assign_requested_numbers(&[], &[Some(2), Some(1), Some(3)]);
        assert_eq!(numbers, vec![2, 1, 3]);
    }
}
