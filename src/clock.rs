//! Wall-clock source for alarm scheduling.
//!
//! Alarm times have minute resolution, so every clock reading is
//! truncated to the start of the current minute.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime, Timelike, Utc};

use crate::config::Timezone;

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Truncate a timestamp to whole minutes.
pub fn to_minute(time: NaiveDateTime) -> NaiveDateTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

/// The process wall clock in the configured zone.
pub struct SystemClock {
    timezone: Timezone,
}

impl SystemClock {
    pub fn new(timezone: Timezone) -> Self {
        Self { timezone }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = match self.timezone {
            Timezone::Local => Local::now().naive_local(),
            Timezone::Utc => Utc::now().naive_utc(),
        };
        to_minute(now)
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(to_minute(start)),
        }
    }

    pub fn set(&self, time: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to_minute(time);
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to_minute(*now + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
