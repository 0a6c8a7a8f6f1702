use rand::Rng;
use super::sampler::sample;
use super::slot_utils::slots_conflict;
use super::types::{Assignment, InstructorPreference, Session};

/// Tries up to `max_attempts` random candidates for `session`.
///
/// A candidate is accepted when its slot is exactly the session's slot and its instructor is
/// not already teaching a conflicting session in `in_progress`. Running out of attempts is a
/// normal outcome and leaves the session unassigned.
pub fn attempt<'a, R>(
    session: &Session,
    preferences: &'a [InstructorPreference],
    in_progress: &Assignment<'a>,
    max_attempts: usize,
    rng: &mut R,
) -> Option<&'a InstructorPreference>
where
    R: Rng + ?Sized,
{
    attempt_with(session, in_progress, max_attempts, || sample(preferences, rng))
}

/// Same admission loop as [`attempt`], drawing candidates from `draw`
pub fn attempt_with<'a, F>(
    session: &Session,
    in_progress: &Assignment<'a>,
    max_attempts: usize,
    mut draw: F,
) -> Option<&'a InstructorPreference>
where
    F: FnMut() -> Option<&'a InstructorPreference>,
{
    for _ in 0..max_attempts {
        // Nothing to draw from, so no later attempt can succeed either
        let candidate = draw()?;
        if is_admissible(session, candidate, in_progress) {
            return Some(candidate);
        }
    }
    None
}

/// Checks whether `candidate` may be bound to `session` given the bindings made so far
pub fn is_admissible(session: &Session, candidate: &InstructorPreference, in_progress: &Assignment<'_>) -> bool {
    if candidate.slot != session.slot {
        return false;
    }

    !in_progress.iter().any(|entry| match entry.instructor {
        Some(bound) => {
            bound.instructor_id == candidate.instructor_id && slots_conflict(&entry.session.slot, &session.slot)
        }
        None => false,
    })
}
