//! Briefing providers: short texts appended to a fired alarm.
//!
//! Every provider is best-effort. A missing config value, an unreachable
//! API or an unexpected payload yields an empty briefing, never an error
//! the scheduler has to deal with.

pub mod health;
pub mod news;
pub mod weather;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use crate::config::Config;
use crate::notifications::Notification;

pub use health::HealthClient;
pub use news::NewsClient;
pub use weather::WeatherClient;

#[derive(Debug, Error)]
pub enum BriefingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} returned status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{0} is missing from config")]
    MissingConfig(&'static str),
    #[error("unexpected {service} payload: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

/// Content collaborators consulted when an alarm fires.
///
/// `today` is the service clock's date, so "yesterday" follows the
/// configured timezone.
#[async_trait]
pub trait Briefings: Send + Sync {
    async fn news_briefing(&self) -> String;

    async fn weather_briefing(&self) -> String;

    async fn health_briefing(&self, today: NaiveDate) -> String;

    /// Fresh notification list, or `None` when the provider cannot supply one.
    async fn news_notifications(&self, _today: NaiveDate) -> Option<Vec<Notification>> {
        None
    }
}

/// Briefings backed by the configured HTTP APIs.
pub struct HttpBriefings {
    news: NewsClient,
    weather: WeatherClient,
    health: HealthClient,
}

impl HttpBriefings {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(3))
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            news: NewsClient::new(client.clone(), config.news.clone()),
            weather: WeatherClient::new(client.clone(), config.weather.clone()),
            health: HealthClient::new(client, config.health.clone()),
        }
    }
}

/// Collapse a briefing result into its text, logging failures.
fn or_empty(kind: &str, result: Result<String, BriefingError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("{kind} briefing unavailable: {e}");
        String::new()
    })
}

#[async_trait]
impl Briefings for HttpBriefings {
    async fn news_briefing(&self) -> String {
        or_empty("News", self.news.briefing().await)
    }

    async fn weather_briefing(&self) -> String {
        or_empty("Weather", self.weather.briefing().await)
    }

    async fn health_briefing(&self, today: NaiveDate) -> String {
        or_empty("Health", self.health.briefing(today).await)
    }

    async fn news_notifications(&self, today: NaiveDate) -> Option<Vec<Notification>> {
        match self.news.notifications(today - Duration::days(1)).await {
            Ok(items) => Some(items),
            Err(e) => {
                warn!("News notifications unavailable: {e}");
                None
            }
        }
    }
}
