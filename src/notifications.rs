//! News notifications shown next to the alarm list.
//!
//! The board is refreshed from the news provider at most once per
//! interval, checked whenever the service is ticked.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::alarm::CancelOutcome;
use crate::briefing::Briefings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub content: String,
}

pub struct NotificationBoard {
    items: Vec<Notification>,
    refresh_interval: Duration,
    last_refresh: Option<NaiveDateTime>,
}

impl NotificationBoard {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            items: Vec::new(),
            refresh_interval,
            last_refresh: None,
        }
    }

    pub fn list(&self) -> &[Notification] {
        &self.items
    }

    pub fn cancel(&mut self, title: &str) -> CancelOutcome {
        match self.items.iter().position(|n| n.title == title) {
            Some(index) => {
                self.items.remove(index);
                info!("Canceling a notification: {title}");
                CancelOutcome::Removed
            }
            None => {
                warn!("Attempted to cancel a notification that does not exist: {title}");
                CancelOutcome::NotFound
            }
        }
    }

    pub fn needs_refresh(&self, now: NaiveDateTime) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => chrono::Duration::from_std(self.refresh_interval)
                .map_or(true, |interval| now - last >= interval),
        }
    }

    /// Replace the board from `source` if the refresh interval has elapsed.
    /// A failed fetch keeps the current notifications.
    pub async fn refresh_if_due(&mut self, source: &dyn Briefings, now: NaiveDateTime) {
        if !self.needs_refresh(now) {
            return;
        }
        self.last_refresh = Some(now);

        match source.news_notifications(now.date()).await {
            Some(items) => {
                debug!("Notification board refreshed with {} items", items.len());
                self.items = items;
            }
            None => debug!("Keeping {} existing notifications", self.items.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Headlines {
        calls: AtomicUsize,
        fail: bool,
    }

    #[derive(Default)]
    struct SinceRecorder(std::sync::Mutex<Vec<NaiveDate>>);

    #[async_trait]
    impl Briefings for SinceRecorder {
        async fn news_briefing(&self) -> String {
            String::new()
        }
        async fn weather_briefing(&self) -> String {
            String::new()
        }
        async fn health_briefing(&self, _today: NaiveDate) -> String {
            String::new()
        }
        async fn news_notifications(&self, today: NaiveDate) -> Option<Vec<Notification>> {
            self.0.lock().unwrap().push(today);
            Some(Vec::new())
        }
    }

    #[async_trait]
    impl Briefings for Headlines {
        async fn news_briefing(&self) -> String {
            String::new()
        }
        async fn weather_briefing(&self) -> String {
            String::new()
        }
        async fn health_briefing(&self, _today: NaiveDate) -> String {
            String::new()
        }
        async fn news_notifications(&self, _today: NaiveDate) -> Option<Vec<Notification>> {
            let n = self.calls.fetch_add(1, Ordering::Relaxed);
            if self.fail {
                return None;
            }
            Some(vec![
                Notification {
                    title: format!("Headline {n}"),
                    content: "body".into(),
                },
                Notification {
                    title: "Other".into(),
                    content: String::new(),
                },
            ])
        }
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn refreshes_once_per_interval() {
        let source = Headlines {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let mut board = NotificationBoard::new(Duration::from_secs(3600));

        board.refresh_if_due(&source, at(8)).await;
        board.refresh_if_due(&source, at(8)).await;
        assert_eq!(source.calls.load(Ordering::Relaxed), 1);
        assert_eq!(board.list()[0].title, "Headline 0");

        board.refresh_if_due(&source, at(9)).await;
        assert_eq!(source.calls.load(Ordering::Relaxed), 2);
        assert_eq!(board.list()[0].title, "Headline 1");
    }

    #[tokio::test]
    async fn cancel_by_title() {
        let source = Headlines {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let mut board = NotificationBoard::new(Duration::from_secs(3600));
        board.refresh_if_due(&source, at(8)).await;

        assert_eq!(board.cancel("Other"), CancelOutcome::Removed);
        assert_eq!(board.cancel("Other"), CancelOutcome::NotFound);
        assert_eq!(board.list().len(), 1);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_items() {
        let ok = Headlines {
            calls: AtomicUsize::new(0),
            fail: false,
        };
        let broken = Headlines {
            calls: AtomicUsize::new(0),
            fail: true,
        };
        let mut board = NotificationBoard::new(Duration::from_secs(60));
        board.refresh_if_due(&ok, at(8)).await;
        board.refresh_if_due(&broken, at(9)).await;

        assert_eq!(broken.calls.load(Ordering::Relaxed), 1);
        assert_eq!(board.list().len(), 2);
    }

    #[tokio::test]
    async fn refresh_passes_the_board_clock_date() {
        let source = SinceRecorder::default();
        let mut board = NotificationBoard::new(Duration::from_secs(3600));
        let other_day = NaiveDate::from_ymd_opt(2031, 2, 3)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();

        board.refresh_if_due(&source, other_day).await;
        assert_eq!(
            source.0.lock().unwrap().as_slice(),
            [NaiveDate::from_ymd_opt(2031, 2, 3).unwrap()]
        );
    }
}
