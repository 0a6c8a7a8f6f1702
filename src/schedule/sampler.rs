use rand::seq::SliceRandom;
use rand::Rng;
use super::types::InstructorPreference;

/// Draws one preference uniformly at random, with replacement.
/// Returns `None` only when there is nothing to draw from.
pub fn sample<'a, R>(preferences: &'a [InstructorPreference], rng: &mut R) -> Option<&'a InstructorPreference>
where
    R: Rng + ?Sized,
{
    preferences.choose(rng)
}
