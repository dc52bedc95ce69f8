//! Ordered in-memory queue of pending alarms.
//!
//! Entries are kept in ascending `fire_time` order; alarms sharing a
//! fire time keep their insertion order.

use chrono::NaiveDateTime;

use super::model::Alarm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Inserted,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Removed,
    NotFound,
}

#[derive(Debug, Default)]
pub struct AlarmStore {
    alarms: Vec<Alarm>,
}

impl AlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `alarm` at its ordered position unless an identical alarm is pending.
    pub fn register(&mut self, alarm: Alarm) -> RegisterOutcome {
        if self.contains(&alarm) {
            return RegisterOutcome::Duplicate;
        }
        let at = self
            .alarms
            .partition_point(|a| a.fire_time <= alarm.fire_time);
        self.alarms.insert(at, alarm);
        RegisterOutcome::Inserted
    }

    /// Remove the earliest pending alarm titled `title`.
    pub fn cancel(&mut self, title: &str) -> CancelOutcome {
        match self.alarms.iter().position(|a| a.title == title) {
            Some(index) => {
                self.alarms.remove(index);
                CancelOutcome::Removed
            }
            None => CancelOutcome::NotFound,
        }
    }

    /// Pop the earliest alarm if it is due at `now`.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Option<Alarm> {
        match self.alarms.first() {
            Some(first) if first.is_due(now) => Some(self.alarms.remove(0)),
            _ => None,
        }
    }

    pub fn contains(&self, alarm: &Alarm) -> bool {
        self.alarms.contains(alarm)
    }

    pub fn find(&self, title: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.title == title)
    }

    pub fn list(&self) -> &[Alarm] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}
