//! Alarm queue and its durability log.
//!
//! - `model`: the `Alarm` entity and its scheduler key
//! - `store`: ordered pending-alarm queue with dedup and cancel-by-title
//! - `record`: text grammar of durability log lines
//! - `journal`: append-only log writer
//! - `replay`: startup reconstruction of the queue from the log

pub mod journal;
pub mod model;
pub mod record;
pub mod replay;
pub mod store;

pub use journal::{AlarmJournal, JournalError};
pub use model::{Alarm, AlarmKey};
pub use record::{LogRecord, ParsedLine};
pub use replay::ReplaySummary;
pub use store::{AlarmStore, CancelOutcome, RegisterOutcome};
