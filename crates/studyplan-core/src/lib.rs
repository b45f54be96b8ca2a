//! # Studyplan Core Library
//!
//! This library provides the business logic for studyplan, a day-by-day
//! study scheduler. All operations are exposed through the `studyplan` CLI
//! binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: Deterministic engine that turns subjects, a horizon and a
//!   daily availability window into an ordered list of study sessions and
//!   breaks
//! - **Storage**: SQLite-based plan storage and TOML-based configuration
//! - **Export**: Pushes a finished plan to Google Calendar, one event per item
//!
//! ## Key Components
//!
//! - [`plan_study`]: Validate a [`PlanRequest`] and run the engine
//! - [`StudyPlan`]: The ordered item sequence of one planning run
//! - [`PlanDb`]: Plan persistence ("current plan" per owner)
//! - [`Config`]: Application configuration management

pub mod error;
pub mod export;
pub mod plan;
pub mod planner;
pub mod storage;

pub use error::{
    ConfigError, CoreError, DatabaseError, ExportError, FormatError, OAuthError, PlanError,
    ValidationError,
};
pub use export::{export_plan, CalendarClient, EventPayload, ExportReport, TokenProvider};
pub use plan::{Instant, PlanItem, PlanSummary, StudyPlan};
pub use planner::{plan_study, plan_study_on, PlanInput, PlanRequest, TimeOfDay};
pub use storage::{Config, PlanDb, StoredItem, StoredPlan};
