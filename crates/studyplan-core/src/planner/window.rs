//! Per-day availability window.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::TimeOfDay;
use crate::plan::Instant;

/// Absolute start/end of one day's availability. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: Instant,
    pub end: Instant,
}

impl DayWindow {
    /// Window for `anchor + day_index`.
    ///
    /// When `end` is not after `start` on the same calendar day the window
    /// wraps midnight and ends on the following day (e.g. 22:00-06:00).
    /// `None` when the day lies beyond the last representable date.
    pub fn build(
        anchor: NaiveDate,
        day_index: u32,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Option<Self> {
        let date = day_date(anchor, day_index)?;
        let start = date.and_time(start.as_naive_time());
        let mut end = date.and_time(end.as_naive_time());
        if end <= start {
            end = end.checked_add_days(Days::new(1))?;
        }
        Some(Self { start, end })
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn contains(&self, start: Instant, end: Instant) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Calendar date of `day_index` days after `anchor`.
pub(crate) fn day_date(anchor: NaiveDate, day_index: u32) -> Option<NaiveDate> {
    anchor.checked_add_days(Days::new(u64::from(day_index)))
}

/// Effective length of a daily window, wrapped over midnight when needed.
pub fn window_minutes(start: TimeOfDay, end: TimeOfDay) -> i64 {
    let span = end.minutes_from_midnight() - start.minutes_from_midnight();
    if span <= 0 {
        span + 24 * 60
    } else {
        span
    }
}
