pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod schedule;

use std::path::{Path, PathBuf};

use tracing::info;

pub use config::SearchConfig;
pub use error::SchedulerError;

use display::{print_assignment, write_assignment, write_summary, SearchSummary};
use parser::{load_preferences, load_sessions};
use schedule::TrialRunner;

/// Loads both input files, runs the search and writes the best schedule into `output_dir`.
///
/// Input errors are reported before any trial runs. Returns the path of the written schedule.
pub fn run_scheduler(
    config: SearchConfig,
    sessions_path: &Path,
    preferences_path: &Path,
    output_dir: &Path,
    verbose: bool,
    summary: bool,
) -> Result<PathBuf, SchedulerError> {
    config.validate()?;

    let sessions = load_sessions(sessions_path)?;
    let preferences = load_preferences(preferences_path)?;

    let runner = TrialRunner::new(&sessions, &preferences, config)?;
    let best = runner.run()?;

    if verbose {
        print_assignment(&best);
    }

    let path = write_assignment(&best.assignment, output_dir)?;
    if summary {
        write_summary(&SearchSummary::new(&config, runner.base_seed(), &best), output_dir)?;
    }

    info!(
        "Best score {} with {}/{} sessions filled",
        best.score,
        best.assignment.filled_count(),
        best.assignment.len()
    );
    Ok(path)
}
