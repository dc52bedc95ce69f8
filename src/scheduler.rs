//! Poll-driven alarm scheduler.
//!
//! There is no timer thread: due alarms are only fired when `tick` is
//! called, which the HTTP layer does on every request. The scheduler
//! tracks pending deadlines by key and never owns the alarms themselves.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::alarm::{Alarm, AlarmKey, AlarmStore};
use crate::handler::{AlarmHandler, FiredAlarm};

#[derive(Debug, Default)]
pub struct Scheduler {
    deadlines: BTreeSet<AlarmKey>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, alarm: &Alarm) {
        if self.deadlines.insert(alarm.key()) {
            debug!("Armed {}", alarm.key());
        }
    }

    pub fn disarm(&mut self, key: &AlarmKey) {
        if self.deadlines.remove(key) {
            debug!("Disarmed {key}");
        }
    }

    pub fn next_deadline(&self) -> Option<NaiveDateTime> {
        self.deadlines.first().map(|key| key.fire_time)
    }

    pub fn armed(&self) -> usize {
        self.deadlines.len()
    }

    /// Fire every alarm due at `now`, earliest first.
    pub async fn tick(
        &mut self,
        store: &mut AlarmStore,
        handler: &AlarmHandler,
        now: NaiveDateTime,
    ) -> Vec<FiredAlarm> {
        let mut fired = Vec::new();

        while let Some(alarm) = store.pop_due(now) {
            self.disarm(&alarm.key());
            fired.push(handler.fire(alarm, now).await);
        }

        // Anything still armed and due had no alarm left in the store to fire.
        while let Some(key) = self.deadlines.first().filter(|k| k.fire_time <= now).cloned() {
            warn!("Deadline {key} elapsed with no matching alarm in the queue");
            self.deadlines.remove(&key);
        }

        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::briefing::Briefings;
    use crate::narrator::Narrator;
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl Briefings for Silent {
        async fn news_briefing(&self) -> String {
            String::new()
        }
        async fn weather_briefing(&self) -> String {
            String::new()
        }
        async fn health_briefing(&self, _today: NaiveDate) -> String {
            String::new()
        }
    }

    #[async_trait]
    impl Narrator for Silent {
        async fn narrate(&self, _text: &str) {}
    }

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn setup(alarms: &[(&str, i64)]) -> (Scheduler, AlarmStore, AlarmHandler) {
        let mut scheduler = Scheduler::new();
        let mut store = AlarmStore::new();
        for (title, minutes) in alarms {
            let alarm = Alarm::new(*title, t(*minutes), false, false);
            scheduler.arm(&alarm);
            store.register(alarm);
        }
        (scheduler, store, AlarmHandler::new(Arc::new(Silent), Arc::new(Silent)))
    }

    #[tokio::test]
    async fn tick_fires_due_alarms_in_order() {
        let (mut scheduler, mut store, handler) = setup(&[("b", 2), ("a", 1), ("later", 10)]);

        assert!(scheduler.tick(&mut store, &handler, t(0)).await.is_empty());

        let fired = scheduler.tick(&mut store, &handler, t(5)).await;
        let titles: Vec<_> = fired.iter().map(|f| f.alarm.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(store.len(), 1);
        assert_eq!(scheduler.armed(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t(10)));
    }

    #[tokio::test]
    async fn orphaned_deadline_is_dropped() {
        let (mut scheduler, mut store, handler) = setup(&[("gone", 1)]);
        store.cancel("gone");

        let fired = scheduler.tick(&mut store, &handler, t(2)).await;
        assert!(fired.is_empty());
        assert_eq!(scheduler.armed(), 0);
        assert_eq!(scheduler.next_deadline(), None);
    }

    #[tokio::test]
    async fn same_title_and_time_with_different_flags_keep_separate_deadlines() {
        let (mut scheduler, mut store, handler) = setup(&[]);
        for news in [false, true] {
            let alarm = Alarm::new("W", t(120), news, false);
            scheduler.arm(&alarm);
            store.register(alarm);
        }
        assert_eq!(scheduler.armed(), 2);

        let key = store.find("W").unwrap().key();
        store.cancel("W");
        scheduler.disarm(&key);

        assert_eq!(scheduler.armed(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t(120)));

        let fired = scheduler.tick(&mut store, &handler, t(120)).await;
        assert_eq!(fired.len(), 1);
        assert!(fired[0].alarm.include_news);
        assert_eq!(scheduler.armed(), 0);
    }
}
