//! Free time left in a day window once breaks are carved out.

use serde::{Deserialize, Serialize};

use super::breaks::BreakInterval;
use super::window::DayWindow;
use super::MIN_BLOCK_MINUTES;
use crate::plan::Instant;

/// A contiguous break-free interval long enough for one minimum block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: Instant,
    pub end: Instant,
}

impl FreeSlot {
    /// `None` when the interval is shorter than one minimum block.
    pub fn new(start: Instant, end: Instant) -> Option<Self> {
        let slot = Self { start, end };
        (slot.duration_minutes() >= MIN_BLOCK_MINUTES).then_some(slot)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Subtract `breaks` from `window`.
///
/// Slots come back in chronological order. Residues shorter than
/// [`MIN_BLOCK_MINUTES`] are dropped rather than merged elsewhere.
pub fn free_slots(window: &DayWindow, breaks: &[BreakInterval]) -> Vec<FreeSlot> {
    let mut sorted: Vec<&BreakInterval> = breaks.iter().collect();
    sorted.sort_by_key(|b| b.start);

    let mut slots = Vec::new();
    let mut cursor = window.start;

    for brk in sorted {
        if brk.start > cursor {
            slots.extend(FreeSlot::new(cursor, brk.start));
        }
        // Overlapping breaks never move the cursor backwards.
        if brk.end > cursor {
            cursor = brk.end;
        }
    }

    if cursor < window.end {
        slots.extend(FreeSlot::new(cursor, window.end));
    }

    slots
}

pub fn total_free_minutes(slots: &[FreeSlot]) -> i64 {
    slots.iter().map(FreeSlot::duration_minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::{place_breaks, TimeOfDay, FIXED_BREAKS};
    use chrono::{Duration, NaiveDate};

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn window(start: &str, end: &str) -> DayWindow {
        DayWindow::build(
            anchor(),
            0,
            TimeOfDay::parse(start).unwrap(),
            TimeOfDay::parse(end).unwrap(),
        )
        .unwrap()
    }

    fn brk(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> BreakInterval {
        BreakInterval {
            title: "Break".into(),
            start: anchor().and_hms_opt(start_h, start_m, 0).unwrap(),
            end: anchor().and_hms_opt(end_h, end_m, 0).unwrap(),
        }
    }

    #[test]
    fn slot_creation_enforces_minimum() {
        let start = anchor().and_hms_opt(9, 0, 0).unwrap();
        assert!(FreeSlot::new(start, start + Duration::minutes(60)).is_some());
        assert!(FreeSlot::new(start, start + Duration::minutes(59)).is_none());
    }

    #[test]
    fn lunch_splits_office_day() {
        let w = window("09:00", "17:00");
        let breaks = place_breaks(&w, FIXED_BREAKS);
        let slots = free_slots(&w, &breaks);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].duration_minutes(), 240);
        assert_eq!(slots[1].duration_minutes(), 180);
        assert_eq!(total_free_minutes(&slots), 420);
    }

    #[test]
    fn no_breaks_yields_whole_window() {
        let w = window("22:00", "06:00");
        let slots = free_slots(&w, &[]);
        assert_eq!(slots, vec![FreeSlot { start: w.start, end: w.end }]);
    }

    #[test]
    fn short_residues_are_dropped() {
        // 12:30-13:00 before lunch is only 30 minutes.
        let w = window("12:30", "16:00");
        let breaks = place_breaks(&w, FIXED_BREAKS);
        let slots = free_slots(&w, &breaks);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start, anchor().and_hms_opt(14, 0, 0).unwrap());
    }

    #[test]
    fn overlapping_and_unsorted_breaks() {
        let w = window("08:00", "18:00");
        let breaks = vec![brk(12, 0, 13, 0), brk(10, 0, 12, 30), brk(10, 30, 11, 0)];
        let slots = free_slots(&w, &breaks);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].end, anchor().and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(slots[1].start, anchor().and_hms_opt(13, 0, 0).unwrap());
    }

    #[test]
    fn back_to_back_breaks_leave_no_empty_slot() {
        let w = window("13:00", "18:00");
        let breaks = vec![brk(13, 0, 14, 0), brk(14, 0, 15, 0)];
        let slots = free_slots(&w, &breaks);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].duration_minutes(), 180);
    }
}
