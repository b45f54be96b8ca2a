//! Greedy slot filling with round-robin subject assignment.

use chrono::Duration;

use super::sizing::pick_block_minutes;
use super::slots::FreeSlot;
use crate::plan::PlanItem;

/// Round-robin position into the subject list.
///
/// Owned by a single planning run and carried across day boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubjectCursor(usize);

impl SubjectCursor {
    pub fn new(position: usize) -> Self {
        Self(position)
    }

    pub fn position(&self) -> usize {
        self.0
    }

    /// Index into a list of `len` subjects; `len` must be non-zero.
    fn index(&self, len: usize) -> usize {
        self.0 % len
    }

    fn advance(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Fills free slots with study blocks for one planning run.
#[derive(Debug)]
pub struct SessionPacker<'a> {
    subjects: &'a [String],
    cursor: SubjectCursor,
}

impl<'a> SessionPacker<'a> {
    pub fn new(subjects: &'a [String]) -> Self {
        Self::with_cursor(subjects, SubjectCursor::default())
    }

    pub fn with_cursor(subjects: &'a [String], cursor: SubjectCursor) -> Self {
        Self { subjects, cursor }
    }

    pub fn cursor(&self) -> SubjectCursor {
        self.cursor
    }

    /// Pack one day's slots (chronological) up to `cap_minutes` of study.
    ///
    /// Each slot is filled front to back until the next block no longer fits,
    /// then packing moves to the next slot. Packing stops entirely once the
    /// cap is reached.
    pub fn pack_day(&mut self, slots: &[FreeSlot], cap_minutes: i64, preferred: i64) -> Vec<PlanItem> {
        let mut sessions = Vec::new();
        if self.subjects.is_empty() || preferred <= 0 {
            return sessions;
        }

        let mut scheduled = 0;
        'slots: for slot in slots {
            let mut cursor = slot.start;
            loop {
                if scheduled >= cap_minutes {
                    break 'slots;
                }
                let slot_remaining = (slot.end - cursor).num_minutes();
                let length = pick_block_minutes(preferred, slot_remaining, cap_minutes - scheduled);
                if length == 0 {
                    break;
                }

                let subject = &self.subjects[self.cursor.index(self.subjects.len())];
                let end = cursor + Duration::minutes(length);
                sessions.push(PlanItem::study(subject, cursor, end));

                cursor = end;
                scheduled += length;
                self.cursor.advance();
            }
        }

        sessions
    }
}
