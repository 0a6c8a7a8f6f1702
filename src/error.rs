use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed tab-delimited data in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}:{line}: unknown week day {value:?}", .path.display())]
    InvalidDay {
        path: PathBuf,
        line: u64,
        value: String,
    },
    #[error("{}:{line}: invalid time slot {value:?} ({reason})", .path.display())]
    InvalidTimeSlot {
        path: PathBuf,
        line: u64,
        value: String,
        reason: String,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Could not serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchedulerError::Io {
            path: path.into(),
            source,
        }
    }
}
