//! NewsAPI headlines for briefings and the notification board.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::BriefingError;
use crate::config::NewsConfig;
use crate::notifications::Notification;

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
}

pub struct NewsClient {
    client: Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(client: Client, config: NewsConfig) -> Self {
        Self { client, config }
    }

    /// `Found N articles for keyword K.` followed by the headlines, one per line.
    pub async fn briefing(&self) -> Result<String, BriefingError> {
        let api_key = required(&self.config.api_key, "news.api_key")?;
        let keyword = required(&self.config.briefing_keyword, "news.briefing_keyword")?;

        let url = format!("{}/top-headlines", self.config.base_url);
        let articles = self
            .fetch(&url, &[("q", keyword), ("apiKey", api_key)])
            .await?;
        let titles: Vec<String> = articles.into_iter().filter_map(|a| a.title).collect();

        Ok(format_briefing(keyword, &titles))
    }

    /// Articles about the notification keyword published since `since`.
    pub async fn notifications(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<Notification>, BriefingError> {
        let api_key = required(&self.config.api_key, "news.api_key")?;
        let keyword = required(&self.config.notification_keyword, "news.notification_keyword")?;

        let url = format!("{}/everything", self.config.base_url);
        let from = since.format("%Y-%m-%d").to_string();
        let articles = self
            .fetch(&url, &[("q", keyword), ("from", from.as_str()), ("apiKey", api_key)])
            .await?;

        Ok(articles
            .into_iter()
            .filter_map(|a| {
                Some(Notification {
                    title: a.title?,
                    content: a.description.unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn fetch(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Article>, BriefingError> {
        let resp = self.client.get(url).query(query).send().await?;
        if !resp.status().is_success() {
            return Err(BriefingError::Status {
                service: "NewsAPI",
                status: resp.status().as_u16(),
            });
        }
        let data: ArticlesResponse = resp.json().await?;
        debug!("NewsAPI returned {} articles", data.articles.len());
        Ok(data.articles)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, BriefingError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(BriefingError::MissingConfig(name))
}

fn format_briefing(keyword: &str, titles: &[String]) -> String {
    format!(
        "Found {} articles for keyword {keyword}. {}",
        titles.len(),
        titles.join("\n")
    )
    .trim_end()
    .to_string()
}
