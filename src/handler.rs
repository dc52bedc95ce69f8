//! Fires a single alarm: compose the briefing text and speak it.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::alarm::model::TIME_FORMAT;
use crate::alarm::Alarm;
use crate::briefing::Briefings;
use crate::narrator::Narrator;

/// An alarm that has fired, with the text that was spoken.
#[derive(Debug, Clone)]
pub struct FiredAlarm {
    pub alarm: Alarm,
    pub text: String,
}

pub struct AlarmHandler {
    briefings: Arc<dyn Briefings>,
    narrator: Arc<dyn Narrator>,
}

impl AlarmHandler {
    pub fn new(briefings: Arc<dyn Briefings>, narrator: Arc<dyn Narrator>) -> Self {
        Self {
            briefings,
            narrator,
        }
    }

    pub fn briefings(&self) -> &dyn Briefings {
        self.briefings.as_ref()
    }

    pub async fn fire(&self, alarm: Alarm, now: NaiveDateTime) -> FiredAlarm {
        if !alarm.is_due(now) {
            warn!(
                "Firing alarm {} before it is due. Alarm time: {}, current time: {}",
                alarm.title,
                alarm.fire_time.format(TIME_FORMAT),
                now.format(TIME_FORMAT),
            );
        }

        let text = self.compose(&alarm, now).await;
        info!("Alarm {} fired", alarm.title);
        self.narrator.narrate(&text).await;

        FiredAlarm { alarm, text }
    }

    /// `Alarm <title> completed.` followed by the requested briefings and
    /// the health statistics. Empty briefings are left out.
    async fn compose(&self, alarm: &Alarm, now: NaiveDateTime) -> String {
        let news = async {
            if alarm.include_news {
                self.briefings.news_briefing().await
            } else {
                String::new()
            }
        };
        let weather = async {
            if alarm.include_weather {
                self.briefings.weather_briefing().await
            } else {
                String::new()
            }
        };
        let (news, weather, health) =
            tokio::join!(news, weather, self.briefings.health_briefing(now.date()));

        let mut parts = vec![format!("Alarm {} completed.", alarm.title)];
        parts.extend(
            [news, weather, health]
                .into_iter()
                .filter(|part| !part.trim().is_empty()),
        );
        parts.join(" ")
    }
}
