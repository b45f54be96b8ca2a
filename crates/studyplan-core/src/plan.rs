//! Plan items and the ordered plan produced by one planning run.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An absolute local wall-clock point in time (date + time of day).
pub type Instant = NaiveDateTime;

/// A scheduled interval: a study session bound to a subject, or a break.
///
/// Items are never re-timed after creation; only `completed` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Subject studied in this session, `None` for breaks.
    pub subject: Option<String>,
    pub title: String,
    pub start: Instant,
    pub end: Instant,
    #[serde(default)]
    pub completed: bool,
}

impl PlanItem {
    /// A study session for `subject`, titled `Study <subject>`.
    pub fn study(subject: &str, start: Instant, end: Instant) -> Self {
        Self {
            subject: Some(subject.to_string()),
            title: format!("Study {subject}"),
            start,
            end,
            completed: false,
        }
    }

    /// A break with no subject.
    pub fn break_item(title: &str, start: Instant, end: Instant) -> Self {
        Self {
            subject: None,
            title: title.to_string(),
            start,
            end,
            completed: false,
        }
    }

    pub fn is_study(&self) -> bool {
        self.subject.is_some()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Calendar date the item starts on.
    pub fn day(&self) -> NaiveDate {
        self.start.date()
    }
}

/// One completed planning run's ordered item sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub items: Vec<PlanItem>,
}

impl StudyPlan {
    pub fn new(items: Vec<PlanItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn study_items(&self) -> impl Iterator<Item = &PlanItem> {
        self.items.iter().filter(|item| item.is_study())
    }

    /// Items grouped by the calendar date they start on, in plan order.
    pub fn days(&self) -> BTreeMap<NaiveDate, Vec<&PlanItem>> {
        let mut days: BTreeMap<NaiveDate, Vec<&PlanItem>> = BTreeMap::new();
        for item in &self.items {
            days.entry(item.day()).or_default().push(item);
        }
        days
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary::from_items(self.items.iter())
    }
}

/// Progress overview of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub study_sessions: usize,
    pub completed_sessions: usize,
    pub break_count: usize,
    pub study_minutes: i64,
    pub minutes_per_subject: BTreeMap<String, i64>,
}

impl PlanSummary {
    pub fn from_items<'a>(items: impl Iterator<Item = &'a PlanItem>) -> Self {
        let mut summary = Self::default();
        for item in items {
            match &item.subject {
                Some(subject) => {
                    summary.study_sessions += 1;
                    if item.completed {
                        summary.completed_sessions += 1;
                    }
                    let minutes = item.duration_minutes();
                    summary.study_minutes += minutes;
                    *summary
                        .minutes_per_subject
                        .entry(subject.clone())
                        .or_insert(0) += minutes;
                }
                None => summary.break_count += 1,
            }
        }
        summary
    }

    /// Share of study sessions marked completed, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.study_sessions == 0 {
            return 0.0;
        }
        self.completed_sessions as f64 / self.study_sessions as f64
    }
}
