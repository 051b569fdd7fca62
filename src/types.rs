use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A fact-check record as stored in the corpus. Immutable once created;
/// duplicates of the same claim are permitted so the corpus can accumulate
/// corroborating entries over time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FactCheckRecord {
    pub id: i64,
    pub claim: String,
    pub verdict: String,
    pub source: String,
    pub url: Option<String>,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the claim store. The store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewFactCheck {
    pub claim: String,
    pub verdict: String,
    pub source: String,
    pub url: Option<String>,
    pub explanation: Option<String>,
}

/// A raw article as returned by a feed collaborator, before classification.
#[derive(Debug, Clone)]
pub struct RawArticle {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A classified news item flowing through one ingestion cycle. Transient:
/// only derived artifacts (snapshot entries, fact-check records) persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_date: DateTime<Utc>,
    pub category: String,
}

/// One entry in the context snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextUpdate {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    pub date: DateTime<Utc>,
    pub update_type: String,
    pub category: String,
}

/// The single live view of recently derived contextual facts. Fully
/// replaced each cycle; entries from a prior cycle never survive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub last_updated: DateTime<Utc>,
    pub structured_updates: BTreeMap<String, ContextUpdate>,
    pub categorized_updates: BTreeMap<String, BTreeMap<String, ContextUpdate>>,
    pub category_counts: BTreeMap<String, usize>,
    pub trusted_sources: BTreeSet<String>,
}

/// Aggregate counts over the corpus, recomputed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub total: i64,
    pub verdicts: BTreeMap<String, i64>,
}

/// Session score and badges for the gamified verification flow. Explicit
/// request state: passed in with each claim and returned updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GamificationState {
    pub points: u32,
    pub badges: Vec<String>,
}

/// Verdict plus explanation from the AI reasoning collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimAnalysis {
    pub classification: String,
    pub explanation: String,
    pub gamification: GamificationState,
}

/// Full response for one verified claim.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictReport {
    pub classification: String,
    pub explanation: String,
    pub related_checks: Vec<String>,
    pub gamification: GamificationState,
}

/// Structured result of one ingestion cycle. Always returned, never a raw
/// fault: per-feed and per-record errors are contained inside the cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum UpdateOutcome {
    Success {
        items_processed: usize,
        duration_seconds: i64,
        timestamp: DateTime<Utc>,
    },
    Error {
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Success { .. })
    }
}

/// Phase of the ingestion cycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Fetching,
    Filtering,
    Aggregating,
    Persisting,
}

#[derive(Debug, thiserror::Error)]
pub enum FactCheckError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("snapshot persistence error: {0}")]
    Snapshot(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("fetch timed out for source {source_name}")]
    FetchTimeout { source_name: String },

    #[error("invalid claim: {0}")]
    InvalidClaim(String),

    #[error("analysis error: {0}")]
    Analysis(String),
}

pub type Result<T> = std::result::Result<T, FactCheckError>;
