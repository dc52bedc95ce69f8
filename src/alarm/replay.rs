//! Startup recovery: rebuild the alarm queue from the durability log.
//!
//! Records are applied strictly in file order. Registrations whose fire
//! time is not in the future are dropped rather than fired late, and
//! nothing read here is ever written back to the log.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::model::TIME_FORMAT;
use super::record::{parse_line, LogRecord, ParsedLine};
use super::store::{AlarmStore, CancelOutcome, RegisterOutcome};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub lines: usize,
    pub restored: usize,
    pub duplicates: usize,
    pub stale: usize,
    pub cancelled: usize,
    pub unparsable: usize,
}

/// Replay the log at `path` into `store`. A missing file is an empty history.
pub fn replay_file(
    path: &Path,
    now: NaiveDateTime,
    store: &mut AlarmStore,
) -> std::io::Result<ReplaySummary> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No alarm log at {}, starting empty", path.display());
            return Ok(ReplaySummary::default());
        }
        Err(e) => return Err(e),
    };

    let summary = replay(BufReader::new(file), now, store)?;
    info!(
        "Replayed {} log lines from {}: {} alarms pending, {} stale, {} cancelled",
        summary.lines,
        path.display(),
        store.len(),
        summary.stale,
        summary.cancelled,
    );
    Ok(summary)
}

pub fn replay(
    reader: impl BufRead,
    now: NaiveDateTime,
    store: &mut AlarmStore,
) -> std::io::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!("Skipping non UTF-8 alarm log line");
                summary.lines += 1;
                summary.unparsable += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        summary.lines += 1;

        match parse_line(&line) {
            ParsedLine::Record(LogRecord::Registered(alarm)) => {
                if alarm.fire_time <= now {
                    debug!(
                        "Dropping elapsed alarm {} ({})",
                        alarm.title,
                        alarm.fire_time.format(TIME_FORMAT)
                    );
                    summary.stale += 1;
                    continue;
                }
                match store.register(alarm) {
                    RegisterOutcome::Inserted => summary.restored += 1,
                    RegisterOutcome::Duplicate => summary.duplicates += 1,
                }
            }
            ParsedLine::Record(LogRecord::Cancelled { title }) => {
                if store.cancel(&title) == CancelOutcome::Removed {
                    summary.cancelled += 1;
                } else {
                    debug!("Cancellation for {title} matched no restored alarm");
                }
            }
            ParsedLine::Unparsable => summary.unparsable += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::model::Alarm;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn reg(title: &str, time: NaiveDateTime) -> String {
        LogRecord::Registered(Alarm::new(title, time, true, false)).to_string()
    }

    fn cancel(title: &str) -> String {
        LogRecord::Cancelled {
            title: title.into(),
        }
        .to_string()
    }

    fn replay_str(log: &str, store: &mut AlarmStore) -> ReplaySummary {
        replay(log.as_bytes(), now(), store).unwrap()
    }

    #[test]
    fn cancellation_only_affects_earlier_registrations() {
        let t1 = now() + Duration::hours(1);
        let t2 = now() + Duration::hours(2);
        let log = [reg("A", t1), cancel("A"), reg("A", t2)].join("\n");

        let mut store = AlarmStore::new();
        replay_str(&log, &mut store);

        assert_eq!(store.list(), [Alarm::new("A", t2, true, false)]);
    }

    #[test]
    fn elapsed_registrations_are_skipped() {
        let log = [
            reg("B", now() - Duration::minutes(5)),
            reg("Now", now()),
            reg("C", now() + Duration::minutes(1)),
        ]
        .join("\n");

        let mut store = AlarmStore::new();
        let summary = replay_str(&log, &mut store);

        assert!(store.find("B").is_none());
        assert!(store.find("Now").is_none());
        assert!(store.find("C").is_some());
        assert_eq!(summary.stale, 2);
        assert_eq!(summary.restored, 1);
    }

    #[test]
    fn replay_is_idempotent() {
        let log = [
            reg("A", now() + Duration::hours(3)),
            reg("B", now() + Duration::hours(1)),
            reg("B", now() + Duration::hours(1)),
            cancel("Ghost"),
            reg("C", now() + Duration::hours(2)),
            cancel("A"),
        ]
        .join("\n");

        let mut once = AlarmStore::new();
        replay_str(&log, &mut once);

        let mut twice = AlarmStore::new();
        replay_str(&log, &mut twice);
        replay_str(&log, &mut twice);

        assert_eq!(once.list(), twice.list());
        let titles: Vec<_> = once.list().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["B", "C"]);
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let log = format!(
            "INFO:werkzeug:GET / 200\n{}\nsome garbage\n\nINFO:root:{}\n",
            reg("A", now() + Duration::hours(1)),
            cancel("Unknown"),
        );

        let mut store = AlarmStore::new();
        let summary = replay_str(&log, &mut store);

        assert_eq!(store.len(), 1);
        assert_eq!(summary.unparsable, 3);
        assert_eq!(summary.cancelled, 0);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = AlarmStore::new();
        let summary = replay_file(&dir.path().join("absent.log"), now(), &mut store).unwrap();

        assert_eq!(summary, ReplaySummary::default());
        assert!(store.is_empty());
    }

    #[test]
    fn replay_does_not_grow_the_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alarms.log");
        let log = [reg("A", now() + Duration::hours(1)), cancel("A")].join("\n") + "\n";
        fs::write(&path, &log).unwrap();

        let mut store = AlarmStore::new();
        replay_file(&path, now(), &mut store).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), log);
    }
}
