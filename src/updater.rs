//! The ingestion cycle: fetch → filter → aggregate → persist.
//!
//! One cycle runs to completion before the next trigger is evaluated; feed
//! fetches are sequential with a courtesy delay in between. Per-feed and
//! per-record faults are contained; only a snapshot write failure (or a
//! top-level orchestration fault) fails the cycle. The caller always gets a
//! structured [`UpdateOutcome`], never a raw error.

use crate::classifier::classify;
use crate::config::UpdaterConfig;
use crate::context::ContextAggregator;
use crate::fetcher::{FetchConfig, NewsApiSource, NewsSource, RssFeedSource};
use crate::state::{CursorStore, SnapshotStore};
use crate::store::ClaimStore;
use crate::types::{
    CyclePhase, FactCheckError, NewFactCheck, NewsItem, RawArticle, Result, UpdateOutcome,
};
use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// The cycle consumes at most this many entries per feed per run.
const MAX_ITEMS_PER_FEED: usize = 10;

/// Items older than this relative to cycle start are silently dropped.
const RECENCY_WINDOW_HOURS: i64 = 24;

pub struct AutoUpdater {
    sources: Vec<Box<dyn NewsSource>>,
    search_provider: Option<Box<dyn NewsSource>>,
    store: ClaimStore,
    snapshots: SnapshotStore,
    cursor: CursorStore,
    aggregator: ContextAggregator,
    fetch_delay: std::time::Duration,
    fetch_timeout: std::time::Duration,
    schedule_hour: u32,
    poll_interval: std::time::Duration,
    phase: Arc<RwLock<CyclePhase>>,
}

impl AutoUpdater {
    /// Bare updater with no sources; pair with [`add_source`] and the
    /// setters. Used directly by tests with fake collaborators.
    ///
    /// [`add_source`]: AutoUpdater::add_source
    pub fn new(store: ClaimStore, snapshots: SnapshotStore, cursor: CursorStore) -> Self {
        Self {
            sources: Vec::new(),
            search_provider: None,
            store,
            snapshots,
            cursor,
            aggregator: ContextAggregator::new(),
            fetch_delay: std::time::Duration::from_secs(1),
            fetch_timeout: std::time::Duration::from_secs(60),
            schedule_hour: 6,
            poll_interval: std::time::Duration::from_secs(60),
            phase: Arc::new(RwLock::new(CyclePhase::Idle)),
        }
    }

    /// Fully wired updater: RSS sources from the roster plus the NewsAPI
    /// collaborator (disabled without a key).
    pub async fn from_config(config: &UpdaterConfig) -> Result<Self> {
        let store = ClaimStore::open(&config.database_url).await?;
        let mut updater = Self::new(
            store,
            SnapshotStore::new(&config.snapshot_path),
            CursorStore::new(&config.cursor_path),
        );

        let fetch_config = FetchConfig::default();
        for feed in &config.feeds {
            match RssFeedSource::new(&feed.name, &feed.url, fetch_config.clone()) {
                Ok(source) => updater.add_source(Box::new(source)),
                Err(e) => warn!("Skipping feed {}: {}", feed.name, e),
            }
        }

        let newsapi = NewsApiSource::new(
            config.newsapi_key.clone(),
            &config.newsapi_country,
            config.newsapi_page_size,
            &fetch_config,
        )?;
        updater.set_search_provider(Box::new(newsapi));

        updater.fetch_delay = config.fetch_delay;
        updater.fetch_timeout = config.fetch_timeout;
        updater.schedule_hour = config.schedule_hour;
        updater.poll_interval = config.poll_interval;

        Ok(updater)
    }

    pub fn add_source(&mut self, source: Box<dyn NewsSource>) {
        info!("Adding news source: {}", source.name());
        self.sources.push(source);
    }

    pub fn set_search_provider(&mut self, provider: Box<dyn NewsSource>) {
        self.search_provider = Some(provider);
    }

    pub fn set_fetch_delay(&mut self, delay: std::time::Duration) {
        self.fetch_delay = delay;
    }

    pub fn set_fetch_timeout(&mut self, timeout: std::time::Duration) {
        self.fetch_timeout = timeout;
    }

    pub fn store(&self) -> &ClaimStore {
        &self.store
    }

    pub async fn current_phase(&self) -> CyclePhase {
        *self.phase.read().await
    }

    /// Run one full ingestion cycle. Always resolves to a structured
    /// outcome; the updater is back in `Idle` afterwards either way.
    pub async fn run_once(&self) -> UpdateOutcome {
        let run_id = Uuid::new_v4();
        let started = Utc::now();
        info!("Starting ingestion cycle {}", run_id);

        let outcome = match self.run_cycle(started).await {
            Ok(items_processed) => {
                if let Err(e) = self.cursor.save_success(Utc::now()) {
                    warn!("Could not stamp update cursor: {}", e);
                }
                let finished = Utc::now();
                let duration_seconds = finished.signed_duration_since(started).num_seconds();
                info!(
                    "Cycle {} completed: {} items in {}s",
                    run_id, items_processed, duration_seconds
                );
                UpdateOutcome::Success {
                    items_processed,
                    duration_seconds,
                    timestamp: finished,
                }
            }
            Err(e) => {
                error!("Cycle {} failed: {}", run_id, e);
                UpdateOutcome::Error {
                    error: e.to_string(),
                    timestamp: Utc::now(),
                }
            }
        };

        self.set_phase(CyclePhase::Idle).await;
        outcome
    }

    /// Run forever: one catch-up cycle when the cursor is stale, then a
    /// daily trigger at the configured local hour, checked on a coarse
    /// polling interval.
    pub async fn run_scheduled(&self) {
        info!(
            "Starting update scheduler, daily run at {:02}:00",
            self.schedule_hour
        );

        let stale = match self.cursor.load() {
            Some(last) => Utc::now().signed_duration_since(last)
                >= Duration::hours(RECENCY_WINDOW_HOURS),
            None => true,
        };
        if stale {
            info!("Last update was more than 24 hours ago, running immediate update");
            self.run_once().await;
        }

        let mut next_trigger = next_occurrence(self.schedule_hour, Local::now().naive_local());
        info!("Next scheduled update at {}", next_trigger);

        loop {
            tokio::time::sleep(self.poll_interval).await;
            let now = Local::now().naive_local();
            if now >= next_trigger {
                self.run_once().await;
                next_trigger = next_occurrence(self.schedule_hour, Local::now().naive_local());
                info!("Next scheduled update at {}", next_trigger);
            }
        }
    }

    async fn run_cycle(&self, cycle_start: DateTime<Utc>) -> Result<usize> {
        self.set_phase(CyclePhase::Fetching).await;
        let mut collected: Vec<NewsItem> = Vec::new();
        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 && !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
            collected.extend(
                self.fetch_from(source.as_ref(), Some(MAX_ITEMS_PER_FEED))
                    .await,
            );
        }
        if let Some(provider) = &self.search_provider {
            collected.extend(self.fetch_from(provider.as_ref(), None).await);
        }

        self.set_phase(CyclePhase::Filtering).await;
        let total = collected.len();
        let recent: Vec<NewsItem> = collected
            .into_iter()
            .filter(|item| {
                cycle_start.signed_duration_since(item.published_date)
                    < Duration::hours(RECENCY_WINDOW_HOURS)
            })
            .collect();
        info!(
            "Collected {} recent news items from {} total",
            recent.len(),
            total
        );

        self.set_phase(CyclePhase::Aggregating).await;
        let snapshot = self.aggregator.aggregate(&recent);
        self.snapshots.save(&snapshot)?;

        self.set_phase(CyclePhase::Persisting).await;
        let mut stored = 0;
        for item in &recent {
            if !qualifies_as_fact_check(item) {
                continue;
            }
            // News from a trusted source, not independently re-verified.
            let record = NewFactCheck {
                claim: item.title.clone(),
                verdict: "Trustworthy".to_string(),
                source: item.source.clone(),
                url: Some(item.url.clone()),
                explanation: Some(item.description.clone()),
            };
            match self.store.insert(&record).await {
                Ok(_) => stored += 1,
                Err(e) => warn!("Could not store news item as fact-check: {}", e),
            }
        }
        debug!("Stored {} fact-check records from this cycle", stored);

        Ok(recent.len())
    }

    async fn fetch_from(&self, source: &dyn NewsSource, cap: Option<usize>) -> Vec<NewsItem> {
        match tokio::time::timeout(self.fetch_timeout, source.fetch()).await {
            Ok(Ok(articles)) => {
                let articles: Vec<RawArticle> = match cap {
                    Some(n) => articles.into_iter().take(n).collect(),
                    None => articles,
                };
                articles
                    .into_iter()
                    .map(|a| news_item_from(a, source.name()))
                    .collect()
            }
            Ok(Err(e)) => {
                warn!("Error fetching news from {}: {}", source.name(), e);
                Vec::new()
            }
            Err(_) => {
                let e = FactCheckError::FetchTimeout {
                    source_name: source.name().to_string(),
                };
                warn!("{}", e);
                Vec::new()
            }
        }
    }

    async fn set_phase(&self, phase: CyclePhase) {
        debug!("Cycle phase: {:?}", phase);
        *self.phase.write().await = phase;
    }
}

fn news_item_from(article: RawArticle, source: &str) -> NewsItem {
    let category = classify(&format!("{} {}", article.title, article.summary));
    NewsItem {
        title: article.title,
        description: article.summary,
        url: article.link,
        source: source.to_string(),
        published_date: article.published_at.unwrap_or_else(Utc::now),
        category: category.to_string(),
    }
}

/// Report-worthy categories with enough body text become corpus records.
fn qualifies_as_fact_check(item: &NewsItem) -> bool {
    matches!(item.category.as_str(), "politics" | "health" | "environment")
        && item.description.chars().count() > 50
}

fn next_occurrence(hour: u32, after: NaiveDateTime) -> NaiveDateTime {
    let today = after
        .date()
        .and_hms_opt(hour.min(23), 0, 0)
        .expect("valid time of day");
    if after < today {
        today
    } else {
        today + Duration::days(1)
    }
}
