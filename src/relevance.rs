//! Relevance scoring for free-text claim lookup.
//!
//! The scoring is a pure function over in-memory candidates; the store maps
//! it onto whatever rows it holds. Earlier query tokens weigh more than
//! later ones, and an exact phrase hit dominates everything.

/// Words that carry no search signal on their own.
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "a", "an",
];

/// Maximum number of query tokens that contribute to a score.
const MAX_SEARCH_TERMS: usize = 5;

/// Score awarded when the whole query appears verbatim inside a claim.
const EXACT_PHRASE_SCORE: i32 = 100;

/// Extract the scored search terms from a raw query: lower-cased whitespace
/// tokens with quote/comma punctuation stripped, minus stop words and tokens
/// of two characters or fewer, capped at the first five.
pub fn search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(|word| word.replace(['\'', '"', ','], ""))
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .take(MAX_SEARCH_TERMS)
        .collect()
}

/// Score one candidate claim against a query. Returns `None` when the claim
/// does not qualify for the result set at all.
///
/// `query_lower` must be the full lower-cased query text and `terms` the
/// output of [`search_terms`] for it. With no usable terms, only exact
/// phrase substring matches qualify.
pub fn score_claim(claim: &str, query_lower: &str, terms: &[String]) -> Option<i32> {
    let claim_lower = claim.to_lowercase();

    if claim_lower.contains(query_lower) {
        return Some(EXACT_PHRASE_SCORE);
    }

    let mut score = 0;
    let mut matched = false;
    for (i, term) in terms.iter().enumerate() {
        if claim_lower.contains(term.as_str()) {
            score += 10 - 2 * i as i32;
            matched = true;
        }
    }

    if matched {
        Some(score)
    } else {
        None
    }
}
