//! Updater configuration: feed roster, collaborator credentials, pacing,
//! and the durable file layout.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

impl FeedSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    pub feeds: Vec<FeedSpec>,
    pub newsapi_key: Option<String>,
    pub newsapi_country: String,
    pub newsapi_page_size: u32,
    /// Pause between consecutive feed fetches, out of courtesy to sources.
    pub fetch_delay: Duration,
    /// Hard cap on any single source fetch; a hanging feed must not stall
    /// the cycle.
    pub fetch_timeout: Duration,
    /// Local hour-of-day for the daily scheduled run.
    pub schedule_hour: u32,
    pub poll_interval: Duration,
    pub database_url: String,
    pub snapshot_path: PathBuf,
    pub cursor_path: PathBuf,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                FeedSpec::new("BBC", "http://feeds.bbci.co.uk/news/rss.xml"),
                FeedSpec::new("Reuters", "http://feeds.reuters.com/reuters/topNews"),
                FeedSpec::new("The Hindu", "https://www.thehindu.com/news/feeder/default.rss"),
                FeedSpec::new("India Today", "https://www.indiatoday.in/rss/1206578"),
                FeedSpec::new(
                    "Times of India",
                    "https://timesofindia.indiatimes.com/rssfeedstopstories.cms",
                ),
            ],
            newsapi_key: None,
            newsapi_country: "in".to_string(),
            newsapi_page_size: 20,
            fetch_delay: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(60),
            schedule_hour: 6,
            poll_interval: Duration::from_secs(60),
            database_url: "sqlite:factchecks.db".to_string(),
            snapshot_path: PathBuf::from("current_context.json"),
            cursor_path: PathBuf::from("last_update.json"),
        }
    }
}

impl UpdaterConfig {
    /// Defaults overridden from the environment: `NEWSAPI_KEY`,
    /// `DATABASE_URL`, `UPDATE_HOUR`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = env::var("NEWSAPI_KEY") {
            if !key.trim().is_empty() {
                config.newsapi_key = Some(key);
            }
        }
        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        if let Ok(hour) = env::var("UPDATE_HOUR") {
            if let Ok(hour) = hour.parse::<u32>() {
                if hour < 24 {
                    config.schedule_hour = hour;
                }
            }
        }

        config
    }
}
