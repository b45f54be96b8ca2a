//! Study block length policy.

use super::{MAX_BLOCK_MINUTES, MIN_BLOCK_MINUTES};

/// Minimum per-subject share of the day before long blocks are offered.
const LONG_BLOCK_SHARE_MINUTES: i64 = 90;

/// Preferred block length for a day, or 0 when nothing can be scheduled.
///
/// Long blocks are only used when every subject could get at least
/// [`LONG_BLOCK_SHARE_MINUTES`] of the day's free time.
pub fn preferred_block_minutes(free_minutes: i64, subject_count: usize) -> i64 {
    if free_minutes < MIN_BLOCK_MINUTES || subject_count == 0 {
        return 0;
    }
    let per_subject = free_minutes / subject_count as i64;
    if per_subject >= LONG_BLOCK_SHARE_MINUTES && free_minutes >= MAX_BLOCK_MINUTES {
        MAX_BLOCK_MINUTES
    } else {
        MIN_BLOCK_MINUTES
    }
}

/// Length of the next block given what is left in the slot and the day's
/// budget: the preferred length, else the minimum, else 0 (stop this slot).
pub fn pick_block_minutes(preferred: i64, slot_remaining: i64, cap_remaining: i64) -> i64 {
    if slot_remaining >= preferred && cap_remaining >= preferred {
        preferred
    } else if slot_remaining >= MIN_BLOCK_MINUTES && cap_remaining >= MIN_BLOCK_MINUTES {
        MIN_BLOCK_MINUTES
    } else {
        0
    }
}
