//! Spoken output for fired alarms.
//!
//! Narration goes through the speech service's HTTP API. The service
//! queues playback itself, so a request only has to be delivered.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TTSConfig;

#[async_trait]
pub trait Narrator: Send + Sync {
    /// Speak `text`. Failures are logged, never returned.
    async fn narrate(&self, text: &str);
}

#[derive(Serialize)]
struct SpeakRequest<'a> {
    text: &'a str,
    summarize: bool,
    event_type: &'static str,
    start_reminder: bool,
}

/// Sends text to the speech service's `/speak` endpoint.
pub struct SpeakerNarrator {
    client: Client,
    api_url: String,
}

impl SpeakerNarrator {
    pub fn new(config: &TTSConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(300))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Narrator for SpeakerNarrator {
    async fn narrate(&self, text: &str) {
        let request = SpeakRequest {
            text,
            summarize: false,
            event_type: "alarm",
            start_reminder: false,
        };

        match self
            .client
            .post(format!("{}/speak", self.api_url))
            .json(&request)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                debug!("Speech service accepted {} chars", text.len());
            }
            Ok(resp) => warn!("Speech service returned status {}", resp.status()),
            Err(e) if e.is_connect() => {
                warn!("Cannot connect to speech service at {}", self.api_url)
            }
            Err(e) if e.is_timeout() => warn!("Speech service request timed out"),
            Err(e) => warn!("Speech service request failed: {e}"),
        }
    }
}

/// Used when speech output is disabled: the text only reaches the log.
pub struct LogNarrator;

#[async_trait]
impl Narrator for LogNarrator {
    async fn narrate(&self, text: &str) {
        info!("Alarm text: {}", text.replace('\n', " "));
    }
}
