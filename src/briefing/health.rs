//! Yesterday's case and death statistics from the UK public health API.

use chrono::{Duration, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::BriefingError;
use crate::config::HealthConfig;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    data: Vec<DailyStats>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyStats {
    date: String,
    new_cases_by_publish_date: Option<i64>,
    cum_cases_by_publish_date: Option<i64>,
    new_deaths_by_publish_date: Option<i64>,
    cum_deaths_by_publish_date: Option<i64>,
}

pub struct HealthClient {
    client: Client,
    config: HealthConfig,
}

impl HealthClient {
    pub fn new(client: Client, config: HealthConfig) -> Self {
        Self { client, config }
    }

    /// Statistics for the day before `today`.
    pub async fn briefing(&self, today: NaiveDate) -> Result<String, BriefingError> {
        let filters = self
            .config
            .filters
            .as_ref()
            .filter(|f| !f.is_empty())
            .ok_or(BriefingError::MissingConfig("health.filters"))?;

        let date = (today - Duration::days(1)).format("%Y-%m-%d").to_string();
        let mut filter_param = filters.join(";");
        filter_param.push_str(&format!(";date={date}"));

        let structure = json!({
            "date": "date",
            "areaName": "areaName",
            "areaCode": "areaCode",
            "newCasesByPublishDate": "newCasesByPublishDate",
            "cumCasesByPublishDate": "cumCasesByPublishDate",
            "newDeathsByPublishDate": "newDeathsByPublishDate",
            "cumDeathsByPublishDate": "cumDeathsByPublishDate",
        })
        .to_string();

        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[("filters", filter_param.as_str()), ("structure", structure.as_str())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(BriefingError::Status {
                service: "health statistics API",
                status: resp.status().as_u16(),
            });
        }

        let data: HealthResponse = resp.json().await?;
        let stats = data.data.first().ok_or_else(|| BriefingError::Malformed {
            service: "health statistics API",
            reason: format!("no data for {date}"),
        })?;
        Ok(format_briefing(stats))
    }
}

fn format_briefing(stats: &DailyStats) -> String {
    let n = |v: Option<i64>| {
        v.map_or_else(|| "an unknown number of".to_string(), |v| v.to_string())
    };
    format!(
        "Received health data for {}: {} new cases bring it to a total of {} cumulative cases, \
         and {} new deaths with a total of {} cumulative deaths.",
        stats.date,
        n(stats.new_cases_by_publish_date),
        n(stats.cum_cases_by_publish_date),
        n(stats.new_deaths_by_publish_date),
        n(stats.cum_deaths_by_publish_date),
    )
}
