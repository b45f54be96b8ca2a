//! Planning-run validation: raw caller input in, a plan or a typed rejection out.

use chrono::{DateTime, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::assembler::{assemble, PlanInput};
use super::window::window_minutes;
use super::{
    TimeOfDay, MAX_HORIZON_DAYS, MAX_PLAN_ITEMS, MAX_STUDY_HOURS_PER_DAY, MIN_BLOCK_MINUTES,
};
use crate::error::{PlanError, ValidationError};
use crate::plan::StudyPlan;

/// Horizon used when the caller does not ask for one.
pub const DEFAULT_HORIZON_DAYS: i64 = 7;

/// A planning request as supplied by a caller (CLI flags, config, JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subjects: Vec<String>,
    #[serde(default)]
    pub days: Option<i64>,
    pub start_time: String,
    pub end_time: String,
    /// Requested study hours per day; defaults to the daily maximum.
    #[serde(default)]
    pub hours_per_day: Option<f64>,
    /// First planned day, `YYYY-MM-DD` or RFC 3339; defaults to today.
    #[serde(default)]
    pub start_date: Option<String>,
}

impl PlanRequest {
    /// Validate and normalize into engine input, with `today` as the default
    /// anchor date.
    pub fn resolve(&self, today: NaiveDate) -> Result<PlanInput, PlanError> {
        let subjects: Vec<String> = self
            .subjects
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        if subjects.is_empty() {
            return Err(ValidationError::NoSubjects.into());
        }

        let start = TimeOfDay::parse(&self.start_time)?;
        let end = TimeOfDay::parse(&self.end_time)?;

        let anchor = match self.start_date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => parse_start_date(value)?,
            _ => today,
        };

        let days = self
            .days
            .unwrap_or(DEFAULT_HORIZON_DAYS)
            .clamp(1, MAX_HORIZON_DAYS);

        // The last window may wrap into the day after the horizon.
        if anchor.checked_add_days(Days::new(days as u64 + 1)).is_none() {
            return Err(ValidationError::InvalidStartDate {
                value: anchor.to_string(),
            }
            .into());
        }

        let window = window_minutes(start, end);
        if window < MIN_BLOCK_MINUTES {
            return Err(ValidationError::WindowTooShort {
                minutes: window,
                min: MIN_BLOCK_MINUTES,
            }
            .into());
        }

        Ok(PlanInput {
            anchor,
            subjects,
            days: days as u32,
            start,
            end,
            cap_minutes: cap_minutes(self.hours_per_day, window),
        })
    }
}

/// Daily study budget in minutes: hours clamped to `[1, 8]`, then to the window.
fn cap_minutes(hours_per_day: Option<f64>, window: i64) -> i64 {
    let max_hours = MAX_STUDY_HOURS_PER_DAY as f64;
    let hours = match hours_per_day {
        Some(h) if h.is_finite() => h.clamp(1.0, max_hours),
        _ => max_hours,
    };
    ((hours * 60.0).round() as i64).min(window)
}

fn parse_start_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ValidationError::InvalidStartDate {
            value: value.to_string(),
        })
}

/// Validate `request`, run the engine and check the result.
///
/// Plans without any study session, or with more than
/// [`MAX_PLAN_ITEMS`] items, are rejected rather than returned.
pub fn plan_study_on(request: &PlanRequest, today: NaiveDate) -> Result<StudyPlan, PlanError> {
    let input = request.resolve(today)?;
    let plan = assemble(&input);

    check_plan(&plan)?;

    tracing::info!(
        anchor = %input.anchor,
        days = input.days,
        subjects = input.subjects.len(),
        items = plan.len(),
        "study plan generated"
    );
    Ok(plan)
}

/// Reject engine output without any study session or with more than
/// [`MAX_PLAN_ITEMS`] items.
fn check_plan(plan: &StudyPlan) -> Result<(), ValidationError> {
    if plan.study_items().next().is_none() {
        return Err(ValidationError::NoStudySessions);
    }
    if plan.len() > MAX_PLAN_ITEMS {
        return Err(ValidationError::TooManyItems {
            count: plan.len(),
            max: MAX_PLAN_ITEMS,
        });
    }
    Ok(())
}

/// [`plan_study_on`] anchored at the local calendar date.
pub fn plan_study(request: &PlanRequest) -> Result<StudyPlan, PlanError> {
    plan_study_on(request, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;
    use crate::plan::PlanItem;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    }

    fn request() -> PlanRequest {
        PlanRequest {
            subjects: vec!["Math".into(), "Physics".into()],
            days: Some(1),
            start_time: "09:00".into(),
            end_time: "17:00".into(),
            hours_per_day: None,
            start_date: None,
        }
    }

    #[test]
    fn defaults_resolve() {
        let mut req = request();
        req.days = None;
        let input = req.resolve(today()).unwrap();
        assert_eq!(input.anchor, today());
        assert_eq!(input.days, 7);
        // 8 hours clamped to the 480 minute window.
        assert_eq!(input.cap_minutes, 480);
    }

    #[test]
    fn subjects_are_trimmed() {
        let mut req = request();
        req.subjects = vec!["  Math ".into(), "".into(), "   ".into()];
        assert_eq!(req.resolve(today()).unwrap().subjects, vec!["Math"]);

        req.subjects = vec![" ".into()];
        assert_eq!(
            req.resolve(today()),
            Err(PlanError::Validation(ValidationError::NoSubjects))
        );
    }

    #[test]
    fn horizon_is_clamped() {
        let mut req = request();
        req.days = Some(0);
        assert_eq!(req.resolve(today()).unwrap().days, 1);
        req.days = Some(500);
        assert_eq!(req.resolve(today()).unwrap().days, 60);
    }

    #[test]
    fn hours_are_clamped_to_range_and_window() {
        assert_eq!(cap_minutes(Some(0.25), 600), 60);
        assert_eq!(cap_minutes(Some(12.0), 600), 480);
        assert_eq!(cap_minutes(Some(3.5), 600), 210);
        assert_eq!(cap_minutes(Some(8.0), 120), 120);
        assert_eq!(cap_minutes(Some(f64::NAN), 600), 480);
    }

    #[test]
    fn bad_time_is_a_format_error() {
        let mut req = request();
        req.end_time = "25:00".into();
        assert_eq!(
            req.resolve(today()),
            Err(PlanError::Format(FormatError::HourOutOfRange { hour: 25 }))
        );
    }

    #[test]
    fn start_date_forms() {
        let mut req = request();
        req.start_date = Some("2025-03-01".into());
        assert_eq!(
            req.resolve(today()).unwrap().anchor,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );

        req.start_date = Some("2025-03-01T23:30:00+02:00".into());
        assert_eq!(
            req.resolve(today()).unwrap().anchor,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );

        req.start_date = Some("next tuesday".into());
        assert!(matches!(
            req.resolve(today()),
            Err(PlanError::Validation(ValidationError::InvalidStartDate { .. }))
        ));
    }

    #[test]
    fn short_window_is_rejected() {
        let mut req = request();
        req.start_time = "09:00".into();
        req.end_time = "09:45".into();
        assert_eq!(
            req.resolve(today()),
            Err(PlanError::Validation(ValidationError::WindowTooShort {
                minutes: 45,
                min: 60
            }))
        );
    }

    #[test]
    fn plan_without_sessions_is_rejected() {
        let mut req = request();
        req.start_time = "13:00".into();
        req.end_time = "14:30".into();
        assert_eq!(
            plan_study_on(&req, today()),
            Err(PlanError::Validation(ValidationError::NoStudySessions))
        );
    }

    #[test]
    fn plan_study_on_returns_sessions() {
        let plan = plan_study_on(&request(), today()).unwrap();
        assert_eq!(plan.len(), 5);
        assert_eq!(plan.study_items().count(), 4);
    }

    #[test]
    fn far_future_start_is_rejected_not_overflowed() {
        let mut req = request();
        req.start_time = "22:00".into();
        req.end_time = "06:00".into();
        req.days = Some(3);
        req.start_date = Some("+262142-12-31".into());
        assert!(matches!(
            plan_study_on(&req, today()),
            Err(PlanError::Validation(ValidationError::InvalidStartDate { .. }))
        ));

        // Defaulted anchors go through the same check.
        req.start_date = None;
        assert!(matches!(
            req.resolve(NaiveDate::MAX),
            Err(PlanError::Validation(ValidationError::InvalidStartDate { .. }))
        ));

        let last_ok = NaiveDate::MAX.checked_sub_days(Days::new(4)).unwrap();
        let plan = plan_study_on(&req, last_ok).unwrap();
        assert_eq!(
            plan.items.last().unwrap().end.date(),
            NaiveDate::MAX.pred_opt().unwrap()
        );
    }

    #[test]
    fn item_ceiling_is_enforced() {
        let start = today().and_hms_opt(0, 0, 0).unwrap();
        let items: Vec<PlanItem> = (0..=MAX_PLAN_ITEMS as i64)
            .map(|i| {
                let s = start + chrono::Duration::minutes(i * 60);
                PlanItem::study("Math", s, s + chrono::Duration::minutes(60))
            })
            .collect();
        let plan = StudyPlan::new(items);
        assert_eq!(
            check_plan(&plan),
            Err(ValidationError::TooManyItems {
                count: MAX_PLAN_ITEMS + 1,
                max: MAX_PLAN_ITEMS
            })
        );

        let mut at_limit = plan.clone();
        at_limit.items.pop();
        assert_eq!(check_plan(&at_limit), Ok(()));
    }

    #[test]
    fn breaks_only_plan_is_rejected() {
        let start = today().and_hms_opt(13, 0, 0).unwrap();
        let plan = StudyPlan::new(vec![PlanItem::break_item(
            "Lunch Break",
            start,
            start + chrono::Duration::minutes(60),
        )]);
        assert_eq!(check_plan(&plan), Err(ValidationError::NoStudySessions));
        assert_eq!(
            check_plan(&StudyPlan::default()),
            Err(ValidationError::NoStudySessions)
        );
    }
}
