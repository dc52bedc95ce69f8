//! Append-only durability log writer.
//!
//! Every append is flushed and synced before returning, so a caller that
//! answers a request after `append` succeeds never reports an alarm that
//! a restart would lose.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error};

use super::model::Alarm;
use super::record::{is_recordable_title, LogRecord};

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("title {0:?} cannot be written as a single log record")]
    UnrecordableTitle(String),
}

pub struct AlarmJournal {
    path: PathBuf,
}

impl AlarmJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log_registration(&self, alarm: &Alarm) -> Result<(), JournalError> {
        self.append(&LogRecord::Registered(alarm.clone()))
    }

    pub fn log_cancellation(&self, title: &str) -> Result<(), JournalError> {
        self.append(&LogRecord::Cancelled {
            title: title.to_string(),
        })
    }

    pub fn append(&self, record: &LogRecord) -> Result<(), JournalError> {
        let title = match record {
            LogRecord::Registered(alarm) => &alarm.title,
            LogRecord::Cancelled { title } => title,
        };
        if !is_recordable_title(title) {
            return Err(JournalError::UnrecordableTitle(title.clone()));
        }

        self.write_line(&record.to_string()).map_err(|source| {
            error!("Failed to append to {}: {source}", self.path.display());
            JournalError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        debug!("Journal: {record}");
        Ok(())
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        file.flush()?;
        file.sync_data()
    }
}
