//! smart-alarm-rs: scheduled alarms with spoken news, weather and health briefings.
//!
//! Pending alarms live in memory; the only persistent state is an
//! append-only text log that is replayed at startup.

pub mod alarm;
pub mod api;
pub mod briefing;
pub mod clock;
pub mod config;
pub mod handler;
pub mod narrator;
pub mod notifications;
pub mod scheduler;
pub mod service;

pub use alarm::{Alarm, AlarmJournal, AlarmStore, CancelOutcome, RegisterOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use handler::{AlarmHandler, FiredAlarm};
pub use service::{AlarmService, RegistrationRequest, RequestError};
