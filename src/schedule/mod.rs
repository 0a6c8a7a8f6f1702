pub mod types;
pub mod slot_utils;
pub mod sampler;
pub mod attempt;
pub mod scoring;
pub mod runner;

pub use types::{AssignedSession, Assignment, InstructorPreference, Session, TimeSlot, TrialResult};
pub use slot_utils::{format_time_range, slots_adjacent, slots_conflict, weekday_name};
pub use sampler::sample;
pub use attempt::attempt;
pub use scoring::{score, score_breakdown, ScoreBreakdown};
pub use runner::{run, TrialRunner};
