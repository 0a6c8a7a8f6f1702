use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;

use crate::error::SchedulerError;

/// Parameters of the trial search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
    pub epochs: usize,
    pub replicates: usize,
    /// Candidate draws per session per trial
    pub max_attempts: usize,
    /// Base seed; drawn at random when absent
    pub seed: Option<u64>,
    /// Size of a dedicated worker pool; rayon's global pool when absent
    pub threads: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            epochs: 100_000,
            replicates: 5,
            max_attempts: 3,
            seed: None,
            threads: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if self.epochs == 0 {
            return Err(SchedulerError::InvalidConfig("epochs must be at least 1".to_string()));
        }
        if self.replicates == 0 {
            return Err(SchedulerError::InvalidConfig("replicates must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(SchedulerError::InvalidConfig("max_attempts must be at least 1".to_string()));
        }
        if self.threads == Some(0) {
            return Err(SchedulerError::InvalidConfig("threads must be at least 1".to_string()));
        }
        if self.epochs.checked_mul(self.replicates).is_none() {
            return Err(SchedulerError::InvalidConfig("epochs x replicates overflows".to_string()));
        }
        Ok(())
    }

    pub fn total_trials(&self) -> usize {
        self.epochs.saturating_mul(self.replicates)
    }
}

/// Command line arguments; every option can also come from the environment or a `.env` file
#[derive(Debug, Parser)]
#[command(name = "session-scheduler")]
#[command(about = "Assigns class sessions to instructors by randomized best-of-many trials")]
pub struct Cli {
    /// Tab-delimited sessions file (header: Day, Time Slot)
    #[arg(long, env = "SCHEDULER_SESSIONS")]
    pub sessions: PathBuf,

    /// Tab-delimited instructor preferences file (header: ID, Name, Day, Time Slot)
    #[arg(long, env = "SCHEDULER_PREFERENCES")]
    pub preferences: PathBuf,

    /// Directory the schedule is written to (created if missing)
    #[arg(long, env = "SCHEDULER_OUTPUT_DIR", default_value = "./")]
    pub output_dir: PathBuf,

    /// Number of epochs
    #[arg(long, env = "SCHEDULER_EPOCHS", default_value = "100000", value_parser = clap::value_parser!(u64).range(1..))]
    pub epochs: u64,

    /// Trials per epoch
    #[arg(long, env = "SCHEDULER_REPLICATES", default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub replicates: u64,

    /// Candidate draws per session before it is left unassigned
    #[arg(long, env = "SCHEDULER_MAX_ATTEMPTS", default_value = "3", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_attempts: u64,

    /// Base random seed, for reproducible runs
    #[arg(long, env = "SCHEDULER_SEED")]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long, env = "SCHEDULER_THREADS", value_parser = clap::value_parser!(u64).range(1..))]
    pub threads: Option<u64>,

    /// Report progress per epoch and print the final schedule
    #[arg(long, short)]
    pub verbose: bool,

    /// Also write output_summary.json next to the schedule
    #[arg(long)]
    pub summary: bool,
}

impl Cli {
    pub fn search_config(&self) -> Result<SearchConfig, SchedulerError> {
        let config = SearchConfig {
            epochs: to_usize("epochs", self.epochs)?,
            replicates: to_usize("replicates", self.replicates)?,
            max_attempts: to_usize("max_attempts", self.max_attempts)?,
            seed: self.seed,
            threads: self.threads.map(|t| to_usize("threads", t)).transpose()?,
        };
        config.validate()?;
        Ok(config)
    }
}

fn to_usize(name: &str, value: u64) -> Result<usize, SchedulerError> {
    usize::try_from(value).map_err(|_| SchedulerError::InvalidConfig(format!("{} is too large: {}", name, value)))
}
