use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveTime, Weekday};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::SchedulerError;
use crate::schedule::slot_utils::{SLOT_SEPARATOR, TIME_FORMAT};
use crate::schedule::types::{InstructorPreference, Session, TimeSlot};

/// One row of the sessions file
#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(rename = "Day")]
    day: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
}

/// One row of the instructor preferences file
#[derive(Debug, Deserialize)]
struct PreferenceRow {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Day")]
    day: String,
    #[serde(rename = "Time Slot")]
    time_slot: String,
}

/// Loads sessions from a tab-delimited file with a `Day<TAB>Time Slot` header
pub fn load_sessions<P: AsRef<Path>>(path: P) -> Result<Vec<Session>, SchedulerError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SchedulerError::io(path, e))?;
    read_sessions(file, path)
}

/// Loads instructor preferences from a tab-delimited file with an `ID<TAB>Name<TAB>Day<TAB>Time Slot` header
pub fn load_preferences<P: AsRef<Path>>(path: P) -> Result<Vec<InstructorPreference>, SchedulerError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SchedulerError::io(path, e))?;
    read_preferences(file, path)
}

/// Parses sessions from any reader; `path` is only used in error messages
pub fn read_sessions<R: Read>(reader: R, path: &Path) -> Result<Vec<Session>, SchedulerError> {
    let sessions = read_rows::<SessionRow, _>(reader, path)?
        .into_iter()
        .map(|(line, row)| {
            let slot = parse_slot(path, line, &row.day, &row.time_slot)?;
            Ok(Session { slot })
        })
        .collect::<Result<Vec<_>, SchedulerError>>()?;

    if sessions.is_empty() {
        warn!("No sessions found in {}", path.display());
    } else {
        info!("Loaded {} sessions from {}", sessions.len(), path.display());
    }
    Ok(sessions)
}

/// Parses instructor preferences from any reader; `path` is only used in error messages
pub fn read_preferences<R: Read>(reader: R, path: &Path) -> Result<Vec<InstructorPreference>, SchedulerError> {
    let preferences = read_rows::<PreferenceRow, _>(reader, path)?
        .into_iter()
        .map(|(line, row)| {
            let slot = parse_slot(path, line, &row.day, &row.time_slot)?;
            Ok(InstructorPreference {
                instructor_id: row.id,
                name: row.name,
                slot,
            })
        })
        .collect::<Result<Vec<_>, SchedulerError>>()?;

    if preferences.is_empty() {
        warn!("No instructor preferences found in {}; every session will stay unassigned", path.display());
    } else {
        info!("Loaded {} instructor preferences from {}", preferences.len(), path.display());
    }
    Ok(preferences)
}

/// Reads every record with its line number. A record whose field count differs from the
/// header, or a header missing a column, fails the whole file.
fn read_rows<T, R>(reader: R, path: &Path) -> Result<Vec<(u64, T)>, SchedulerError>
where
    T: DeserializeOwned,
    R: Read,
{
    let csv_error = |source| SchedulerError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());
        let row: T = record.deserialize(Some(&headers)).map_err(csv_error)?;
        rows.push((line, row));
    }

    Ok(rows)
}

fn parse_slot(path: &Path, line: u64, day: &str, time_slot: &str) -> Result<TimeSlot, SchedulerError> {
    let week_day = parse_weekday(day).ok_or_else(|| SchedulerError::InvalidDay {
        path: path.to_path_buf(),
        line,
        value: day.to_string(),
    })?;

    parse_time_slot(week_day, time_slot).map_err(|reason| SchedulerError::InvalidTimeSlot {
        path: path.to_path_buf(),
        line,
        value: time_slot.to_string(),
        reason,
    })
}

/// Accepts full or abbreviated English day names, in any case
fn parse_weekday(value: &str) -> Option<Weekday> {
    value.trim().parse::<Weekday>().ok()
}

/// Parses "09:00 AM - 10:00 AM" into a slot on `week_day`
fn parse_time_slot(week_day: Weekday, value: &str) -> Result<TimeSlot, String> {
    let (start, end) = value
        .split_once(SLOT_SEPARATOR)
        .ok_or_else(|| format!("expected \"start{}end\"", SLOT_SEPARATOR))?;
    let start_time = parse_time(start)?;
    let end_time = parse_time(end)?;
    TimeSlot::new(week_day, start_time, end_time)
}

fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|e| format!("cannot read time {:?}: {}", value, e))
}
