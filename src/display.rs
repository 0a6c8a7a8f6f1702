use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use tracing::info;

use crate::config::SearchConfig;
use crate::error::SchedulerError;
use crate::schedule::slot_utils::{format_time_range, weekday_name};
use crate::schedule::scoring::{score_breakdown, ADJACENCY_BONUS, UNASSIGNED_PENALTY};
use crate::schedule::types::{Assignment, TrialResult};

/// File name of the written schedule inside the output directory
pub const SCHEDULE_FILE_NAME: &str = "output_schedules.txt";

/// File name of the optional run summary
pub const SUMMARY_FILE_NAME: &str = "output_summary.json";

/// Machine-readable record of the best result of a run
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub epochs: usize,
    pub replicates: usize,
    pub max_attempts: usize,
    pub seed: u64,
    pub trials: usize,
    pub best_trial: usize,
    pub score: i64,
    pub sessions: usize,
    pub filled: usize,
    pub unassigned: usize,
    pub adjacent_pairs: usize,
}

impl SearchSummary {
    pub fn new(config: &SearchConfig, seed: u64, best: &TrialResult<'_>) -> Self {
        let breakdown = score_breakdown(&best.assignment);
        Self {
            epochs: config.epochs,
            replicates: config.replicates,
            max_attempts: config.max_attempts,
            seed,
            trials: config.total_trials(),
            best_trial: best.trial,
            score: best.score,
            sessions: best.assignment.len(),
            filled: best.assignment.filled_count(),
            unassigned: breakdown.unassigned,
            adjacent_pairs: breakdown.adjacent_pairs,
        }
    }
}

/// Writes the assignment as tab-delimited rows (day, "start - end", instructor id, name), one per
/// session in input order. Unassigned sessions get empty id and name columns.
pub fn write_assignment(assignment: &Assignment<'_>, output_dir: &Path) -> Result<PathBuf, SchedulerError> {
    let target = output_dir.join(SCHEDULE_FILE_NAME);
    write_atomically(&target, |file| {
        let mut wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(file);

        for entry in assignment.iter() {
            let slot = &entry.session.slot;
            let (id, name) = match entry.instructor {
                Some(pref) => (pref.instructor_id.as_str(), pref.name.as_str()),
                None => ("", ""),
            };
            wtr.write_record([weekday_name(slot.week_day()), format_time_range(slot).as_str(), id, name])
                .map_err(|source| SchedulerError::Csv { path: target.clone(), source })?;
        }

        wtr.flush().map_err(|e| SchedulerError::io(&target, e))
    })?;

    info!("Schedule written to {}", target.display());
    Ok(target)
}

/// Writes the run summary as pretty JSON
pub fn write_summary(summary: &SearchSummary, output_dir: &Path) -> Result<PathBuf, SchedulerError> {
    let target = output_dir.join(SUMMARY_FILE_NAME);
    let json = serde_json::to_string_pretty(summary)?;
    write_atomically(&target, |file| {
        writeln!(file, "{}", json).map_err(|e| SchedulerError::io(&target, e))
    })?;

    info!("Summary written to {}", target.display());
    Ok(target)
}

/// Creates the parent directory, writes to a sibling temp file, then renames it over `target`.
/// The temp file is removed if anything fails, so `target` is either the old file or complete.
fn write_atomically<F>(target: &Path, write: F) -> Result<(), SchedulerError>
where
    F: FnOnce(&mut File) -> Result<(), SchedulerError>,
{
    if let Some(dir) = target.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| SchedulerError::io(dir, e))?;
        }
    }

    let tmp = temp_path(target);

    let result = File::create(&tmp)
        .map_err(|e| SchedulerError::io(&tmp, e))
        .and_then(|mut file| {
            write(&mut file)?;
            file.sync_all().map_err(|e| SchedulerError::io(&tmp, e))
        })
        .and_then(|_| fs::rename(&tmp, target).map_err(|e| SchedulerError::io(target, e)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

/// Sibling of `target` unique to this process and call: `<target>.<pid>.<random>.tmp`
fn temp_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(format!(".{}.{:08x}.tmp", std::process::id(), rand::random::<u32>()));
    PathBuf::from(name)
}

/// Prints the assignment in a readable format
pub fn print_assignment(best: &TrialResult<'_>) {
    let breakdown = score_breakdown(&best.assignment);

    println!("\n=== Best Schedule (trial {}) ===", best.trial + 1);
    println!(
        "Sessions filled: {}/{}",
        best.assignment.filled_count(),
        best.assignment.len()
    );
    println!(
        "Score: {} ({} unassigned x {}, {} back-to-back pairs x +{})",
        breakdown.total, breakdown.unassigned, UNASSIGNED_PENALTY, breakdown.adjacent_pairs, ADJACENCY_BONUS
    );

    println!();
    for entry in best.assignment.iter() {
        let slot = &entry.session.slot;
        match entry.instructor {
            Some(pref) => println!(
                "  {:<9} {} -> {} (ID: {})",
                weekday_name(slot.week_day()),
                format_time_range(slot),
                pref.name,
                pref.instructor_id
            ),
            None => println!(
                "  {:<9} {} -> [UNASSIGNED]",
                weekday_name(slot.week_day()),
                format_time_range(slot)
            ),
        }
    }
}
