//! Day-by-day study scheduling engine.
//!
//! One planning run walks each day of the horizon and, for every day:
//! - builds the availability window (possibly wrapping midnight)
//! - places the fixed recurring breaks that fit inside it
//! - subtracts the breaks to get free slots of at least one minimum block
//! - packs study blocks into the slots, assigning subjects round-robin
//! - merges sessions and breaks into one time-ordered sequence
//!
//! The engine is a pure function of its [`PlanInput`]; the only ambient input
//! is "today" when a [`PlanRequest`] carries no start date.

pub mod assembler;
pub mod breaks;
pub mod packer;
pub mod request;
pub mod sizing;
pub mod slots;
pub mod time_of_day;
pub mod window;

pub use assembler::{assemble, PlanInput};
pub use breaks::{place_breaks, BreakInterval, FixedBreakSpec, FIXED_BREAKS};
pub use packer::{SessionPacker, SubjectCursor};
pub use request::{plan_study, plan_study_on, PlanRequest};
pub use sizing::{pick_block_minutes, preferred_block_minutes};
pub use slots::{free_slots, total_free_minutes, FreeSlot};
pub use time_of_day::TimeOfDay;
pub use window::DayWindow;

/// Shortest study block, and the shortest free slot worth keeping.
pub const MIN_BLOCK_MINUTES: i64 = 60;
/// Longest study block.
pub const MAX_BLOCK_MINUTES: i64 = 120;
/// Upper bound on the requested daily study budget.
pub const MAX_STUDY_HOURS_PER_DAY: i64 = 8;
/// Upper bound on the planning horizon.
pub const MAX_HORIZON_DAYS: i64 = 60;
/// A plan with more items than this is rejected.
pub const MAX_PLAN_ITEMS: usize = 1000;
