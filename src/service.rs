//! Claim verification service: the request-handling boundary between an
//! (external) web endpoint and the core.
//!
//! Gamification state is explicit per-request state, passed in and returned
//! updated; nothing here is process-global.

use crate::analysis::ClaimAnalyzer;
use crate::store::ClaimStore;
use crate::types::{FactCheckError, GamificationState, NewFactCheck, Result, VerdictReport};
use tracing::{info, warn};

/// How many prior fact-checks to surface alongside a fresh verdict.
const RELATED_CHECK_LIMIT: usize = 3;

/// Source attribution for records derived from the analyzer rather than a
/// publisher.
const AI_SOURCE: &str = "AI";

pub struct ClaimService {
    store: ClaimStore,
    analyzer: Box<dyn ClaimAnalyzer>,
}

impl ClaimService {
    pub fn new(store: ClaimStore, analyzer: Box<dyn ClaimAnalyzer>) -> Self {
        Self { store, analyzer }
    }

    /// Verify one claim: consult the corpus, ask the analyzer, persist the
    /// fresh verdict so the corpus learns over time.
    ///
    /// Corpus lookup failures degrade to an empty related list and a failed
    /// persist is logged and skipped; only a blank claim or an analyzer
    /// fault fails the request.
    pub async fn verify(
        &self,
        claim: &str,
        prior: GamificationState,
    ) -> Result<VerdictReport> {
        if claim.trim().is_empty() {
            return Err(FactCheckError::InvalidClaim(
                "claim text must not be empty".to_string(),
            ));
        }

        let related_checks = match self.store.search(claim, RELATED_CHECK_LIMIT).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Corpus lookup failed, continuing without context: {}", e);
                Vec::new()
            }
        };

        let analysis = self.analyzer.analyze(claim, &prior).await?;

        let record = NewFactCheck {
            claim: claim.to_string(),
            verdict: analysis.classification.clone(),
            source: AI_SOURCE.to_string(),
            url: None,
            explanation: Some(analysis.explanation.clone()),
        };
        match self.store.insert(&record).await {
            Ok(id) => info!("Stored analysis as fact-check {}: {}", id, analysis.classification),
            Err(e) => warn!("Could not store analysis result: {}", e),
        }

        Ok(VerdictReport {
            classification: analysis.classification,
            explanation: analysis.explanation,
            related_checks,
            gamification: analysis.gamification,
        })
    }

    pub fn store(&self) -> &ClaimStore {
        &self.store
    }
}
