//! Current conditions from OpenWeatherMap.

use reqwest::Client;
use serde::Deserialize;

use super::BriefingError;
use crate::config::WeatherConfig;

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<Readings>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Readings {
    temp: f64,
}

pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(client: Client, config: WeatherConfig) -> Self {
        Self { client, config }
    }

    pub async fn briefing(&self) -> Result<String, BriefingError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(BriefingError::MissingConfig("weather.api_key"))?;
        let city = self
            .config
            .city
            .as_deref()
            .ok_or(BriefingError::MissingConfig("weather.city"))?;

        let resp = self
            .client
            .get(format!("{}/weather", self.config.base_url))
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BriefingError::Status {
                service: "OpenWeatherMap",
                status: resp.status().as_u16(),
            });
        }

        let data: WeatherResponse = resp.json().await?;
        format_briefing(city, &data)
    }
}

fn format_briefing(city: &str, data: &WeatherResponse) -> Result<String, BriefingError> {
    let malformed = |reason: &str| BriefingError::Malformed {
        service: "OpenWeatherMap",
        reason: reason.to_string(),
    };
    let condition = data.weather.first().ok_or_else(|| malformed("no conditions"))?;
    let readings = data.main.as_ref().ok_or_else(|| malformed("no readings"))?;

    Ok(format!(
        "Weather in {city}: {}, {:.0} degrees.",
        condition.description, readings.temp
    ))
}
