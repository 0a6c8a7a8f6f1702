use chrono::{NaiveTime, Weekday};
use serde::Serialize;

/// A (day, start, end) slot. `end_time` is always after `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    week_day: Weekday,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl TimeSlot {
    pub fn new(week_day: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self, String> {
        if end_time <= start_time {
            return Err(format!(
                "end time {} is not after start time {}",
                end_time.format("%H:%M"),
                start_time.format("%H:%M")
            ));
        }
        Ok(Self { week_day, start_time, end_time })
    }

    pub fn week_day(&self) -> Weekday {
        self.week_day
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }
}

/// A class session that needs exactly one instructor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Session {
    pub slot: TimeSlot,
}

/// One slot an instructor has declared they can teach
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InstructorPreference {
    pub instructor_id: String,
    pub name: String,
    pub slot: TimeSlot,
}

/// A session together with the preference bound to it, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignedSession<'a> {
    pub session: &'a Session,
    pub instructor: Option<&'a InstructorPreference>,
}

/// One entry per input session, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment<'a> {
    entries: Vec<AssignedSession<'a>>,
}

impl<'a> Assignment<'a> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    pub(crate) fn push(&mut self, session: &'a Session, instructor: Option<&'a InstructorPreference>) {
        self.entries.push(AssignedSession { session, instructor });
    }

    pub fn entries(&self) -> &[AssignedSession<'a>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignedSession<'a>> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn filled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.instructor.is_some()).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.len() - self.filled_count()
    }
}

/// The scored outcome of a single trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialResult<'a> {
    /// Zero-based global index: `epoch * replicates + replicate`
    pub trial: usize,
    pub score: i64,
    pub assignment: Assignment<'a>,
}

impl TrialResult<'_> {
    /// Higher score wins; on a tie the earlier trial is kept
    pub fn beats(&self, other: &Self) -> bool {
        self.score > other.score || (self.score == other.score && self.trial < other.trial)
    }
}
