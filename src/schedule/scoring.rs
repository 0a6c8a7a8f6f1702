use std::collections::HashMap;
use chrono::{NaiveTime, Weekday};
use serde::Serialize;
use super::types::Assignment;

/// Score change for every session left without an instructor
pub const UNASSIGNED_PENALTY: i64 = -5;

/// Score change for every pair of back-to-back sessions taught by the same instructor
pub const ADJACENCY_BONUS: i64 = 2;

/// The parts a score is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub unassigned: usize,
    pub adjacent_pairs: usize,
    pub total: i64,
}

pub fn score(assignment: &Assignment<'_>) -> i64 {
    score_breakdown(assignment).total
}

/// Counts unassigned sessions and same-instructor adjacent pairs.
///
/// Every assigned session is indexed by (instructor, day, start time); each pair is then found
/// once, from the earlier session, by looking up its end time. Slots always end after they start,
/// so a pair can never be counted from both sides.
pub fn score_breakdown(assignment: &Assignment<'_>) -> ScoreBreakdown {
    let mut starts: HashMap<(&str, Weekday, NaiveTime), usize> = HashMap::new();
    let mut unassigned = 0;

    for entry in assignment.iter() {
        match entry.instructor {
            Some(pref) => {
                let slot = &entry.session.slot;
                *starts
                    .entry((pref.instructor_id.as_str(), slot.week_day(), slot.start_time()))
                    .or_insert(0) += 1;
            }
            None => unassigned += 1,
        }
    }

    let adjacent_pairs: usize = assignment
        .iter()
        .filter_map(|entry| {
            let pref = entry.instructor?;
            let slot = &entry.session.slot;
            starts
                .get(&(pref.instructor_id.as_str(), slot.week_day(), slot.end_time()))
                .copied()
        })
        .sum();

    let total = UNASSIGNED_PENALTY * unassigned as i64 + ADJACENCY_BONUS * adjacent_pairs as i64;

    ScoreBreakdown {
        unassigned,
        adjacent_pairs,
        total,
    }
}
