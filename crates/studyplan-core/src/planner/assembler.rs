//! Drives one planning run across the horizon and merges each day's
//! sessions and breaks into a single ordered plan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::breaks::{place_breaks, FIXED_BREAKS};
use super::packer::SessionPacker;
use super::sizing::preferred_block_minutes;
use super::slots::{free_slots, total_free_minutes};
use super::window::DayWindow;
use super::TimeOfDay;
use crate::plan::{PlanItem, StudyPlan};

/// Validated engine input.
///
/// `days` is expected in `[1, 60]` and `cap_minutes` in `[1, 480]` and no
/// longer than the daily window; [`PlanRequest::resolve`] guarantees both.
///
/// [`PlanRequest::resolve`]: super::PlanRequest::resolve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanInput {
    pub anchor: NaiveDate,
    pub subjects: Vec<String>,
    pub days: u32,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub cap_minutes: i64,
}

/// Run the engine. The subject cursor carries over from one day to the next.
pub fn assemble(input: &PlanInput) -> StudyPlan {
    let mut packer = SessionPacker::new(&input.subjects);
    let mut items = Vec::new();

    for day_index in 0..input.days {
        let Some(window) = DayWindow::build(input.anchor, day_index, input.start, input.end)
        else {
            tracing::warn!(
                day = day_index,
                anchor = %input.anchor,
                "day beyond last representable date"
            );
            break;
        };
        let breaks = place_breaks(&window, FIXED_BREAKS);
        let slots = free_slots(&window, &breaks);

        let free_minutes = total_free_minutes(&slots);
        let day_cap = input.cap_minutes.min(free_minutes);
        let preferred = preferred_block_minutes(free_minutes, input.subjects.len());

        let sessions = if free_minutes == 0 || preferred == 0 {
            Vec::new()
        } else {
            packer.pack_day(&slots, day_cap, preferred)
        };

        tracing::debug!(
            day = day_index,
            window_start = %window.start,
            window_end = %window.end,
            breaks = breaks.len(),
            free_minutes,
            preferred,
            sessions = sessions.len(),
            "planned day"
        );

        let mut day: Vec<PlanItem> = sessions;
        day.extend(breaks.iter().map(|b| b.to_item()));
        // Stable: equal starts keep sessions ahead of breaks.
        day.sort_by_key(|item| item.start);
        items.extend(day);
    }

    StudyPlan::new(items)
}
