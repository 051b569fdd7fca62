//! Persistent fact-check corpus backed by SQLite.
//!
//! Records are append-only: there is no update or delete, and duplicate
//! claims are accepted so corroborating entries can accumulate. Lookup is a
//! ranked in-memory scan over the (small) corpus using the pure scoring in
//! [`crate::relevance`].

use crate::relevance::{score_claim, search_terms};
use crate::types::{FactCheckRecord, NewFactCheck, Result, StoreStats};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, info};

pub struct ClaimStore {
    db: Pool<Sqlite>,
}

impl ClaimStore {
    /// Open (creating if missing) the store at the given sqlx SQLite URL,
    /// e.g. `sqlite:factchecks.db`.
    ///
    /// A single pooled connection serializes statements, which is what gives
    /// readers a consistent view while an insert is in flight.
    pub async fn open(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS fact_checks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                claim TEXT NOT NULL,
                verdict TEXT NOT NULL,
                source TEXT NOT NULL,
                url TEXT,
                explanation TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&db)
        .await?;

        Ok(Self { db })
    }

    /// In-memory store for tests.
    pub async fn in_memory() -> Result<Self> {
        Self::open("sqlite::memory:").await
    }

    /// Append a new immutable record and return its assigned id.
    pub async fn insert(&self, record: &NewFactCheck) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO fact_checks (claim, verdict, source, url, explanation, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.claim)
        .bind(&record.verdict)
        .bind(&record.source)
        .bind(&record.url)
        .bind(&record.explanation)
        .bind(Utc::now())
        .execute(&self.db)
        .await?;

        let id = result.last_insert_rowid();
        debug!("Inserted fact-check {}: {}", id, record.claim);
        Ok(id)
    }

    /// Ranked free-text lookup. Returns at most `limit` formatted matches,
    /// best first; blank queries return an empty list rather than an error.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_lower = query.to_lowercase();
        let terms = search_terms(query);
        debug!("Searching corpus with terms {:?}", terms);

        let records = self.all_records().await?;
        let mut scored: Vec<(i32, &FactCheckRecord)> = records
            .iter()
            .filter_map(|r| score_claim(&r.claim, &query_lower, &terms).map(|s| (s, r)))
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.claim.chars().count().cmp(&b.1.claim.chars().count()))
        });

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, r)| format_match(r))
            .collect())
    }

    /// Aggregate counts grouped by verdict, recomputed on every call.
    pub async fn stats(&self) -> Result<StoreStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fact_checks")
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query("SELECT verdict, COUNT(*) AS count FROM fact_checks GROUP BY verdict")
            .fetch_all(&self.db)
            .await?;

        let mut verdicts = BTreeMap::new();
        for row in rows {
            verdicts.insert(row.try_get::<String, _>("verdict")?, row.try_get::<i64, _>("count")?);
        }

        Ok(StoreStats { total, verdicts })
    }

    /// Newest-first listing of stored records.
    pub async fn recent(&self, limit: usize) -> Result<Vec<FactCheckRecord>> {
        let records = sqlx::query_as::<_, FactCheckRecord>(
            r#"
            SELECT id, claim, verdict, source, url, explanation, created_at
            FROM fact_checks
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn all_records(&self) -> Result<Vec<FactCheckRecord>> {
        let records = sqlx::query_as::<_, FactCheckRecord>(
            "SELECT id, claim, verdict, source, url, explanation, created_at FROM fact_checks",
        )
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    /// Seed the corpus with a starter set of well-known fact-checks,
    /// including current Indian political office holders.
    pub async fn seed_sample_data(&self) -> Result<usize> {
        let samples = sample_fact_checks();
        let count = samples.len();
        for sample in &samples {
            self.insert(sample).await?;
        }
        info!("Seeded {} sample fact-checks", count);
        Ok(count)
    }
}

fn format_match(record: &FactCheckRecord) -> String {
    let mut formatted = format!(
        "{} — {} ({})",
        record.claim, record.verdict, record.source
    );
    if let Some(url) = &record.url {
        formatted.push(' ');
        formatted.push_str(url);
    }
    formatted
}

fn sample_fact_checks() -> Vec<NewFactCheck> {
    vec![
        NewFactCheck {
            claim: "COVID-19 vaccines contain microchips".to_string(),
            verdict: "False".to_string(),
            source: "WHO".to_string(),
            url: Some("https://www.who.int/emergencies/diseases/novel-coronavirus-2019/advice-for-public/mythbusters".to_string()),
            explanation: Some("COVID-19 vaccines do not contain microchips. This is a completely false conspiracy theory.".to_string()),
        },
        NewFactCheck {
            claim: "5G networks cause COVID-19".to_string(),
            verdict: "False".to_string(),
            source: "WHO".to_string(),
            url: Some("https://www.who.int/emergencies/diseases/novel-coronavirus-2019/advice-for-public/mythbusters".to_string()),
            explanation: Some("Viruses cannot spread through mobile networks. COVID-19 is spread through respiratory droplets.".to_string()),
        },
        NewFactCheck {
            claim: "Vitamin C prevents COVID-19".to_string(),
            verdict: "Mixed".to_string(),
            source: "Mayo Clinic".to_string(),
            url: Some("https://www.mayoclinic.org/diseases-conditions/coronavirus/in-depth/coronavirus-myths/art-20485720".to_string()),
            explanation: Some("While vitamin C supports immune function, there's no evidence it prevents COVID-19 specifically.".to_string()),
        },
        NewFactCheck {
            claim: "Jagan Mohan Reddy is the current CM of Andhra Pradesh".to_string(),
            verdict: "False".to_string(),
            source: "Election Commission of India".to_string(),
            url: Some("https://eci.gov.in/".to_string()),
            explanation: Some("As of June 2024, Chandrababu Naidu (TDP) is the Chief Minister of Andhra Pradesh. Jagan Mohan Reddy (YSRCP) lost the 2024 assembly elections.".to_string()),
        },
        NewFactCheck {
            claim: "Chandrababu Naidu is the current CM of Andhra Pradesh".to_string(),
            verdict: "Trustworthy".to_string(),
            source: "The Hindu".to_string(),
            url: Some("https://www.thehindu.com/news/national/andhra-pradesh/".to_string()),
            explanation: Some("Chandrababu Naidu of Telugu Desam Party (TDP) became the Chief Minister of Andhra Pradesh in June 2024 after winning the assembly elections.".to_string()),
        },
        NewFactCheck {
            claim: "TDP won Andhra Pradesh elections in 2024".to_string(),
            verdict: "Trustworthy".to_string(),
            source: "Election Commission of India".to_string(),
            url: Some("https://eci.gov.in/".to_string()),
            explanation: Some("The Telugu Desam Party (TDP) led by Chandrababu Naidu won the Andhra Pradesh assembly elections in 2024, defeating the incumbent YSRCP.".to_string()),
        },
    ]
}
