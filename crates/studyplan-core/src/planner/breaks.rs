//! Fixed recurring breaks, materialized per day.

use chrono::{Days, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::window::DayWindow;
use crate::plan::{Instant, PlanItem};

/// A recurring break defined by whole hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBreakSpec {
    pub title: &'static str,
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Breaks placed on every planned day.
pub const FIXED_BREAKS: &[FixedBreakSpec] = &[
    FixedBreakSpec {
        title: "Lunch Break",
        start_hour: 13,
        end_hour: 14,
    },
    FixedBreakSpec {
        title: "Snack Break",
        start_hour: 17,
        end_hour: 18,
    },
    FixedBreakSpec {
        title: "Dinner Break",
        start_hour: 20,
        end_hour: 21,
    },
];

/// A break placed on a concrete day, fully inside that day's window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub title: String,
    pub start: Instant,
    pub end: Instant,
}

impl BreakInterval {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn to_item(&self) -> PlanItem {
        PlanItem::break_item(&self.title, self.start, self.end)
    }
}

impl FixedBreakSpec {
    /// Candidate interval on `date`; wraps to the next day when the end hour
    /// is not after the start hour.
    fn on(&self, date: NaiveDate) -> Option<(Instant, Instant)> {
        let midnight = date.and_time(NaiveTime::MIN);
        let start = midnight.checked_add_signed(Duration::hours(i64::from(self.start_hour)))?;
        let mut end = midnight.checked_add_signed(Duration::hours(i64::from(self.end_hour)))?;
        if end <= start {
            end = end.checked_add_days(Days::new(1))?;
        }
        Some((start, end))
    }
}

/// Place each spec on the window's opening day, keeping only breaks that lie
/// fully inside `window`. A break starting before the window opens is moved
/// to the next calendar day first, so overnight windows pick up
/// early-morning breaks.
pub fn place_breaks(window: &DayWindow, specs: &[FixedBreakSpec]) -> Vec<BreakInterval> {
    let date = window.start.date();

    let mut placed: Vec<BreakInterval> = specs
        .iter()
        .filter_map(|spec| {
            let (mut start, mut end) = spec.on(date)?;
            if start < window.start {
                start = start.checked_add_days(Days::new(1))?;
                end = end.checked_add_days(Days::new(1))?;
            }
            window.contains(start, end).then(|| BreakInterval {
                title: spec.title.to_string(),
                start,
                end,
            })
        })
        .collect();

    placed.sort_by_key(|b| b.start);
    placed
}
