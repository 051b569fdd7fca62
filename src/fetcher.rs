//! Feed collaborators: RSS sources and the optional keyed news-search API.
//!
//! Each source is independently fault-tolerant; the ingestion cycle treats a
//! failed fetch as zero items from that source.

use crate::types::{FactCheckError, RawArticle, Result};
use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::exponential::ExponentialBackoff;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Trait for pulling raw articles from an external news source.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Human-readable source name, used for attribution on persisted records.
    fn name(&self) -> &str;

    /// Fetch the current batch of articles. May return fewer than the source
    /// publishes; may fail independently of other sources.
    async fn fetch(&self) -> Result<Vec<RawArticle>>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "factcheck-updater/1.0".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 2,
        }
    }
}

pub fn build_client(config: &FetchConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;
    Ok(client)
}

/// One RSS/Atom feed.
pub struct RssFeedSource {
    name: String,
    url: String,
    client: Client,
    config: FetchConfig,
}

impl RssFeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>, config: FetchConfig) -> Result<Self> {
        let url = url.into();
        let parsed = Url::parse(&url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FactCheckError::Parse(format!(
                "unsupported feed scheme: {}",
                parsed.scheme()
            )));
        }

        let client = build_client(&config)?;
        Ok(Self {
            name: name.into(),
            url,
            client,
            config,
        })
    }

    async fn fetch_body(&self) -> Result<String> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 16),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 30)),
            ..Default::default()
        };

        let mut last_error: Option<FactCheckError> = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(&self.url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text().await?);
                }
                Ok(response) => {
                    last_error = Some(FactCheckError::Parse(format!(
                        "HTTP {} from {}",
                        response.status(),
                        self.url
                    )));
                }
                Err(e) => {
                    last_error = Some(FactCheckError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!(
                        "Attempt {} failed for {}, retrying in {:?}",
                        attempt + 1,
                        self.url,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FactCheckError::Parse(format!("fetch failed for {}", self.url))))
    }
}

#[async_trait]
impl NewsSource for RssFeedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>> {
        info!("Fetching news from {}", self.name);
        let body = self.fetch_body().await?;

        let feed = feed_rs::parser::parse(body.as_bytes())
            .map_err(|e| FactCheckError::Parse(format!("failed to parse feed: {}", e)))?;

        let mut articles = Vec::new();
        for entry in feed.entries {
            let Some(link) = entry.links.first().map(|l| l.href.clone()) else {
                debug!("Skipping entry without link in {}", self.name);
                continue;
            };
            let title = match entry.title {
                Some(t) => t.content,
                None => {
                    debug!("Skipping untitled entry in {}", self.name);
                    continue;
                }
            };
            let summary = entry.summary.map(|s| s.content).unwrap_or_default();
            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc));

            articles.push(RawArticle {
                title,
                summary,
                link,
                published_at,
            });
        }

        info!("Fetched {} articles from {}", articles.len(), self.name);
        Ok(articles)
    }
}

const NEWSAPI_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";

/// Keyed top-headlines search collaborator. Without a configured API key the
/// source is disabled and fetches resolve to an empty batch.
pub struct NewsApiSource {
    api_key: Option<String>,
    country: String,
    page_size: u32,
    client: Client,
}

impl NewsApiSource {
    pub fn new(
        api_key: Option<String>,
        country: impl Into<String>,
        page_size: u32,
        config: &FetchConfig,
    ) -> Result<Self> {
        Ok(Self {
            api_key,
            country: country.into(),
            page_size,
            client: build_client(config)?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<chrono::DateTime<Utc>>,
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self) -> Result<Vec<RawArticle>> {
        let Some(api_key) = &self.api_key else {
            info!("NewsAPI key not configured, skipping NewsAPI fetch");
            return Ok(Vec::new());
        };

        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(NEWSAPI_ENDPOINT)
            .query(&[
                ("apiKey", api_key.as_str()),
                ("country", self.country.as_str()),
                ("category", "general"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: NewsApiResponse = response.json().await?;

        let articles = payload
            .articles
            .into_iter()
            .filter_map(|a| {
                let title = a.title?;
                let link = a.url?;
                Some(RawArticle {
                    title,
                    summary: a.description.unwrap_or_default(),
                    link,
                    published_at: a.published_at,
                })
            })
            .collect::<Vec<_>>();

        info!("Fetched {} articles from NewsAPI", articles.len());
        Ok(articles)
    }
}
