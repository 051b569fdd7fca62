//! Context aggregation: fold one cycle's classified news items into a
//! [`ContextSnapshot`].
//!
//! Political items are mined for structured signals (office holders,
//! elections, parties); other report-worthy categories get date-keyed
//! headline entries. The snapshot is rebuilt from scratch every cycle and
//! fully replaces its predecessor.

use crate::types::{ContextSnapshot, ContextUpdate, NewsItem};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Regions recognized for chief-minister updates.
const REGIONS: &[&str] = &[
    "andhra pradesh",
    "telangana",
    "karnataka",
    "tamil nadu",
    "kerala",
    "maharashtra",
    "gujarat",
    "west bengal",
    "rajasthan",
    "punjab",
];

/// Parties recognized for party-update slots.
const PARTIES: &[&str] = &["bjp", "congress", "tdp", "ysrcp", "aap", "dmk", "shiv sena"];

/// Election vocabulary; any hit marks the item election-related.
const ELECTION_TERMS: &[&str] = &["election", "voting", "poll", "ballot", "constituency"];

/// Categories that produce date-keyed headline entries.
const HEADLINE_CATEGORIES: &[&str] = &[
    "health",
    "science",
    "technology",
    "business",
    "sports",
    "entertainment",
    "education",
];

pub struct ContextAggregator;

impl ContextAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build a fresh snapshot from one cycle's items. Input order is feed
    /// iteration order; later items overwrite earlier ones on the same
    /// structured key.
    pub fn aggregate(&self, items: &[NewsItem]) -> ContextSnapshot {
        let mut structured: BTreeMap<String, ContextUpdate> = BTreeMap::new();

        for item in items {
            if item.category == "politics" {
                self.extract_political_signals(item, &mut structured);
            } else if HEADLINE_CATEGORIES.contains(&item.category.as_str()) {
                let key = format!(
                    "{}_{}_{}",
                    item.category,
                    item.published_date.format("%Y%m%d"),
                    structured.len()
                );
                structured.insert(key, update_from(item, "headline"));
            }
        }

        let mut categorized: BTreeMap<String, BTreeMap<String, ContextUpdate>> = BTreeMap::new();
        for (key, update) in &structured {
            categorized
                .entry(update.category.clone())
                .or_default()
                .insert(key.clone(), update.clone());
        }

        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut trusted_sources = BTreeSet::new();
        for item in items {
            *category_counts.entry(item.category.clone()).or_insert(0) += 1;
            trusted_sources.insert(item.source.clone());
        }

        info!(
            "Aggregated {} items into {} structured updates across {} categories",
            items.len(),
            structured.len(),
            categorized.len()
        );

        ContextSnapshot {
            last_updated: Utc::now(),
            structured_updates: structured,
            categorized_updates: categorized,
            category_counts,
            trusted_sources,
        }
    }

    fn extract_political_signals(
        &self,
        item: &NewsItem,
        structured: &mut BTreeMap<String, ContextUpdate>,
    ) {
        let text = format!("{} {}", item.title, item.description).to_lowercase();

        if text.contains("chief minister") || has_word(&text, "cm") {
            for region in REGIONS {
                if text.contains(region) {
                    let key = format!("{}_cm", region.replace(' ', "_"));
                    debug!("CM update for {} from {}", region, item.source);
                    structured.insert(key, update_from(item, "chief_minister"));
                }
            }
        }

        if text.contains("prime minister") || has_word(&text, "pm") {
            structured.insert("prime_minister".to_string(), update_from(item, "prime_minister"));
        }

        if ELECTION_TERMS.iter().any(|t| text.contains(t)) {
            let key = if text.contains("lok sabha") {
                "lok_sabha_election"
            } else if text.contains("assembly") {
                "assembly_election"
            } else if text.contains("municipal") {
                "municipal_election"
            } else {
                "general_election"
            };
            structured.insert(key.to_string(), update_from(item, "election"));
        }

        if text.contains("governor") {
            structured.insert("governor_update".to_string(), update_from(item, "governor"));
        }

        // One party slot per item: only the first recognized party counts.
        if let Some(party) = PARTIES.iter().find(|p| text.contains(*p)) {
            let key = format!("{}_update", party.replace(' ', "_"));
            structured.insert(key, update_from(item, "party"));
        }
    }
}

impl Default for ContextAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn update_from(item: &NewsItem, update_type: &str) -> ContextUpdate {
    ContextUpdate {
        title: item.title.clone(),
        description: item.description.clone(),
        source: item.source.clone(),
        url: item.url.clone(),
        date: item.published_date,
        update_type: update_type.to_string(),
        category: item.category.clone(),
    }
}

/// Standalone-word containment, so "cm" matches "new CM sworn in" but not
/// "macmillan".
fn has_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric()).any(|t| t == word)
}
