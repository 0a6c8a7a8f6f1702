use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::SchedulerError;
use super::attempt::attempt;
use super::scoring::score;
use super::types::{Assignment, InstructorPreference, Session, TrialResult};

/// Runs the epoch x replicate trial grid and keeps the best-scoring assignment.
///
/// Each trial draws from its own RNG, seeded from the base seed and the trial index, so the result
/// depends only on the inputs, the configuration and the seed. Thread count does not matter.
pub struct TrialRunner<'a> {
    sessions: &'a [Session],
    preferences: &'a [InstructorPreference],
    config: SearchConfig,
    base_seed: u64,
}

impl<'a> TrialRunner<'a> {
    pub fn new(
        sessions: &'a [Session],
        preferences: &'a [InstructorPreference],
        config: SearchConfig,
    ) -> Result<Self, SchedulerError> {
        config.validate()?;
        let base_seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            sessions,
            preferences,
            config,
            base_seed,
        })
    }

    /// The seed every trial RNG is derived from
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn trial_rng(&self, trial: usize) -> StdRng {
        trial_rng(self.base_seed, trial)
    }

    /// Runs a single trial by its global index
    pub fn run_trial(&self, trial: usize) -> TrialResult<'a> {
        let mut rng = self.trial_rng(trial);
        run_trial(self.sessions, self.preferences, self.config.max_attempts, trial, &mut rng)
    }

    /// Runs every trial and returns the best one
    pub fn run(&self) -> Result<TrialResult<'a>, SchedulerError> {
        info!(
            sessions = self.sessions.len(),
            preferences = self.preferences.len(),
            epochs = self.config.epochs,
            replicates = self.config.replicates,
            max_attempts = self.config.max_attempts,
            seed = self.base_seed,
            "Starting search"
        );

        let best = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(|| self.search())
            }
            None => self.search(),
        };

        info!(
            trials = self.config.total_trials(),
            best_trial = best.trial,
            score = best.score,
            filled = best.assignment.filled_count(),
            unassigned = best.assignment.unassigned_count(),
            seed = self.base_seed,
            "Search finished"
        );

        Ok(best)
    }

    /// Runs epochs in parallel, keeping only (trial, score) per epoch, then walks them in epoch
    /// order to track the running best. The winning trial is replayed from its seed to rebuild
    /// its assignment.
    fn search(&self) -> TrialResult<'a> {
        let epoch_bests: Vec<(usize, i64)> = (0..self.config.epochs)
            .into_par_iter()
            .map(|epoch| {
                let best = self.run_epoch(epoch);
                (best.trial, best.score)
            })
            .collect();

        let mut best: Option<(usize, i64)> = None;
        for (epoch, &(trial, score)) in epoch_bests.iter().enumerate() {
            // Earlier epochs hold earlier trials, so strict improvement keeps ties on the first
            if best.map_or(true, |(_, best_score)| score > best_score) {
                debug!(epoch = epoch + 1, trial, score, "New best");
                best = Some((trial, score));
            }
        }

        // validate() guarantees at least one epoch
        self.run_trial(best.map_or(0, |(trial, _)| trial))
    }

    fn run_epoch(&self, epoch: usize) -> TrialResult<'a> {
        let first = epoch * self.config.replicates;
        let best = (first + 1..first + self.config.replicates)
            .map(|trial| self.run_trial(trial))
            .fold(self.run_trial(first), keep_better);

        debug!(
            epoch = epoch + 1,
            epochs = self.config.epochs,
            best_trial = best.trial,
            score = best.score,
            "Epoch finished"
        );

        best
    }
}

/// Seeds the RNG of one trial. Distinct trials get distinct, well-spread seeds.
pub fn trial_rng(base_seed: u64, trial: usize) -> StdRng {
    StdRng::seed_from_u64(base_seed.wrapping_add((trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)))
}

/// Fills every session once, in input order, then scores the result
pub fn run_trial<'a, R>(
    sessions: &'a [Session],
    preferences: &'a [InstructorPreference],
    max_attempts: usize,
    trial: usize,
    rng: &mut R,
) -> TrialResult<'a>
where
    R: Rng + ?Sized,
{
    let mut assignment = Assignment::with_capacity(sessions.len());
    for session in sessions {
        let chosen = attempt(session, preferences, &assignment, max_attempts, rng);
        assignment.push(session, chosen);
    }

    let score = score(&assignment);
    TrialResult {
        trial,
        score,
        assignment,
    }
}

/// Fold step: a trial replaces the current best only with a strictly higher score
/// (ties go to the earlier trial)
pub fn keep_better<'a>(best: TrialResult<'a>, candidate: TrialResult<'a>) -> TrialResult<'a> {
    if candidate.beats(&best) {
        candidate
    } else {
        best
    }
}

/// Convenience wrapper: build a runner and run it
pub fn run<'a>(
    sessions: &'a [Session],
    preferences: &'a [InstructorPreference],
    config: SearchConfig,
) -> Result<TrialResult<'a>, SchedulerError> {
    TrialRunner::new(sessions, preferences, config)?.run()
}
