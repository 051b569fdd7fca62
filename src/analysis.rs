//! The AI reasoning collaborator behind claim verification.
//!
//! The core treats the analyzer as authoritative and opaque: it takes the
//! claim plus the caller's prior gamification state and returns a verdict
//! with the updated state. Swapping in a hosted model is a matter of adding
//! another `ClaimAnalyzer` implementation.

use crate::types::{ClaimAnalysis, GamificationState, Result};
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait ClaimAnalyzer: Send + Sync {
    /// Name of this analyzer, for logging.
    fn analyzer_name(&self) -> String;

    /// Analyze a claim given the caller's prior score and badges.
    async fn analyze(&self, claim: &str, prior: &GamificationState) -> Result<ClaimAnalysis>;
}

/// Points awarded for every analyzed claim.
const POINTS_PER_CHECK: u32 = 10;

/// Badge thresholds, unlocked once the running score reaches them.
const BADGE_THRESHOLDS: &[(u32, &str)] = &[
    (10, "Curious Mind"),
    (50, "Fact Finder"),
    (100, "Truth Seeker"),
    (250, "Myth Buster"),
];

/// Deterministic analyzer for development and testing. Classifies with a
/// couple of coarse text heuristics and applies the standard gamification
/// progression.
pub struct MockAnalyzer {
    name: String,
}

impl MockAnalyzer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn classify(&self, claim: &str) -> (&'static str, String) {
        let lower = claim.to_lowercase();
        if lower.contains("microchip") || lower.contains("flat earth") || lower.contains("5g") {
            (
                "False",
                "This matches a well-documented misinformation pattern.".to_string(),
            )
        } else if lower.contains("vaccine") || lower.contains("climate") {
            (
                "Trustworthy",
                "Consistent with the established scientific consensus.".to_string(),
            )
        } else {
            (
                "Unknown",
                "This claim requires further verification against reliable sources.".to_string(),
            )
        }
    }
}

#[async_trait]
impl ClaimAnalyzer for MockAnalyzer {
    fn analyzer_name(&self) -> String {
        format!("Mock Analyzer ({})", self.name)
    }

    async fn analyze(&self, claim: &str, prior: &GamificationState) -> Result<ClaimAnalysis> {
        let (classification, explanation) = self.classify(claim);

        let points = prior.points + POINTS_PER_CHECK;
        let mut badges = prior.badges.clone();
        for (threshold, badge) in BADGE_THRESHOLDS {
            if points >= *threshold && !badges.iter().any(|b| b == badge) {
                badges.push(badge.to_string());
            }
        }

        debug!(
            "Analyzed claim with {}: {} ({} points)",
            self.analyzer_name(),
            classification,
            points
        );

        Ok(ClaimAnalysis {
            classification: classification.to_string(),
            explanation,
            gamification: GamificationState { points, badges },
        })
    }
}
