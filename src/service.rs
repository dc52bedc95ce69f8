//! Alarm service: owns the queue, scheduler, journal and notification board.
//!
//! BOOT (replay log) → SERVING (register / cancel / tick per request)
//!
//! Every mutation is written to the journal before the queue changes, so
//! a request that returns success is already durable.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{info, warn};

use crate::alarm::model::{REQUEST_TIME_FORMAT, TIME_FORMAT};
use crate::alarm::record::is_recordable_title;
use crate::alarm::{
    replay, Alarm, AlarmJournal, AlarmStore, CancelOutcome, JournalError, RegisterOutcome,
};
use crate::clock::Clock;
use crate::handler::{AlarmHandler, FiredAlarm};
use crate::notifications::{Notification, NotificationBoard};
use crate::scheduler::Scheduler;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid time format given: {0}")]
    InvalidTime(String),
    #[error("alarm title is missing")]
    MissingTitle,
    #[error("alarm title {0:?} cannot be stored")]
    InvalidTitle(String),
    #[error("an alarm titled {0:?} is already pending")]
    TitleInUse(String),
    #[error(transparent)]
    Journal(#[from] JournalError),
}

/// Raw registration parameters as they arrive from the front end.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    /// `YYYY-MM-DDTHH:MM`
    pub alarm: String,
    pub title: Option<String>,
    pub news: bool,
    pub weather: bool,
}

impl RegistrationRequest {
    pub fn into_alarm(self) -> Result<Alarm, RequestError> {
        let fire_time = NaiveDateTime::parse_from_str(self.alarm.trim(), REQUEST_TIME_FORMAT)
            .map_err(|_| RequestError::InvalidTime(self.alarm.clone()))?;

        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(RequestError::MissingTitle)?;
        if !is_recordable_title(&title) {
            return Err(RequestError::InvalidTitle(title));
        }

        Ok(Alarm::new(title, fire_time, self.news, self.weather))
    }
}

pub struct AlarmService {
    store: AlarmStore,
    scheduler: Scheduler,
    journal: AlarmJournal,
    handler: AlarmHandler,
    notifications: NotificationBoard,
    clock: Arc<dyn Clock>,
}

impl AlarmService {
    /// Rebuild state from the journal. Must complete before the first tick.
    pub fn restore(
        journal: AlarmJournal,
        handler: AlarmHandler,
        clock: Arc<dyn Clock>,
        notification_refresh: Duration,
    ) -> Self {
        let mut store = AlarmStore::new();
        if let Err(e) = replay::replay_file(journal.path(), clock.now(), &mut store) {
            warn!("Failed to replay {}: {e}, starting empty", journal.path().display());
            store = AlarmStore::new();
        }

        let mut scheduler = Scheduler::new();
        for alarm in store.list() {
            scheduler.arm(alarm);
        }

        Self {
            store,
            scheduler,
            journal,
            handler,
            notifications: NotificationBoard::new(notification_refresh),
            clock,
        }
    }

    /// Titles are unique among pending alarms: cancellation is by title, so
    /// a second pending alarm with the same title could not be cancelled
    /// the same way after a restart.
    pub fn register(&mut self, alarm: Alarm) -> Result<RegisterOutcome, RequestError> {
        if self.store.contains(&alarm) {
            info!("Ignoring duplicate alarm {}", alarm.title);
            return Ok(RegisterOutcome::Duplicate);
        }
        if self.store.find(&alarm.title).is_some() {
            return Err(RequestError::TitleInUse(alarm.title));
        }

        self.journal.log_registration(&alarm)?;
        info!(
            "Registering an alarm: {} on {}, include news: {}, include weather: {}",
            alarm.title,
            alarm.fire_time.format(TIME_FORMAT),
            alarm.include_news,
            alarm.include_weather,
        );
        self.scheduler.arm(&alarm);
        Ok(self.store.register(alarm))
    }

    /// Parse and register a front-end request. Malformed input is logged and
    /// leaves the service untouched.
    pub fn register_request(
        &mut self,
        request: RegistrationRequest,
    ) -> Result<RegisterOutcome, RequestError> {
        let result = request.into_alarm().and_then(|alarm| self.register(alarm));
        if let Err(e) = &result {
            warn!("Alarm registration ignored: {e}");
        }
        result
    }

    pub fn cancel_alarm(&mut self, title: &str) -> Result<CancelOutcome, RequestError> {
        let Some(key) = self.store.find(title).map(Alarm::key) else {
            warn!("Attempted to cancel an alarm that does not exist: {title}");
            return Ok(CancelOutcome::NotFound);
        };

        if let Err(e) = self.journal.log_cancellation(title) {
            warn!("Alarm cancellation ignored: {e}");
            return Err(e.into());
        }
        info!("Canceling an alarm: {title}");
        self.scheduler.disarm(&key);
        Ok(self.store.cancel(title))
    }

    pub fn cancel_notification(&mut self, title: &str) -> CancelOutcome {
        self.notifications.cancel(title)
    }

    /// Fire due alarms and refresh notifications if their interval elapsed.
    pub async fn tick(&mut self) -> Vec<FiredAlarm> {
        let now = self.clock.now();
        let fired = self
            .scheduler
            .tick(&mut self.store, &self.handler, now)
            .await;
        self.notifications
            .refresh_if_due(self.handler.briefings(), now)
            .await;
        fired
    }

    pub fn alarms(&self) -> &[Alarm] {
        self.store.list()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.list()
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.scheduler.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(alarm: &str, title: Option<&str>) -> RegistrationRequest {
        RegistrationRequest {
            alarm: alarm.into(),
            title: title.map(String::from),
            news: true,
            weather: false,
        }
    }

    #[test]
    fn request_parses_datetime_local_format() {
        let alarm = request("2026-10-17T07:30", Some("  Wake ")).into_alarm().unwrap();
        assert_eq!(alarm.title, "Wake");
        assert_eq!(alarm.fire_time.format(TIME_FORMAT).to_string(), "2026-10-17 07:30");
        assert!(alarm.include_news);
        assert!(!alarm.include_weather);
    }

    #[test]
    fn request_rejects_bad_input() {
        assert!(matches!(
            request("tomorrow", Some("Wake")).into_alarm(),
            Err(RequestError::InvalidTime(_))
        ));
        assert!(matches!(
            request("2026-10-17 07:30", Some("Wake")).into_alarm(),
            Err(RequestError::InvalidTime(_))
        ));
        assert!(matches!(
            request("2026-10-17T07:30", None).into_alarm(),
            Err(RequestError::MissingTitle)
        ));
        assert!(matches!(
            request("2026-10-17T07:30", Some("   ")).into_alarm(),
            Err(RequestError::MissingTitle)
        ));
        assert!(matches!(
            request("2026-10-17T07:30", Some("a\nb")).into_alarm(),
            Err(RequestError::InvalidTitle(_))
        ));
    }
}
