//! Rule-based topic classification for news items.
//!
//! Pure, deterministic, case-insensitive substring matching against a fixed
//! taxonomy. Political signal dominates: if any politics keyword matches the
//! item is `politics` regardless of what else matches. Otherwise the
//! category with the most keyword hits wins, ties going to the category
//! declared first in the table.

pub const POLITICS: &str = "politics";
pub const GENERAL: &str = "general";

/// Checked first; any hit wins unconditionally.
const POLITICS_KEYWORDS: &[&str] = &[
    "chief minister",
    "prime minister",
    "president",
    "election",
    "government",
    "minister",
    "parliament",
    "assembly",
    "lok sabha",
    "rajya sabha",
    "governor",
    "constituency",
    "voting",
    "ballot",
    "poll",
    "bjp",
    "congress",
    "tdp",
    "ysrcp",
    "aap",
    "dmk",
    "shiv sena",
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

/// Remaining taxonomy in declaration order. Order matters: it is the
/// tie-break when two categories count the same number of keyword hits.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "health",
        &[
            "covid", "vaccine", "health", "medical", "disease", "treatment", "hospital",
            "doctor", "clinical trial", "medicine", "outbreak", "therapy", "patients",
        ],
    ),
    (
        "science",
        &[
            "research", "study", "scientist", "discovery", "space", "satellite", "isro",
            "nasa", "laboratory", "physics", "genome", "climate",
        ],
    ),
    (
        "technology",
        &[
            "technology", "software", "artificial intelligence", "smartphone", "startup",
            "cyber", "internet", "bitcoin", "blockchain", "gadget", "semiconductor",
        ],
    ),
    (
        "business",
        &[
            "stock", "market", "economy", "finance", "business", "company", "shares",
            "sensex", "nifty", "bank", "investment", "inflation", "gdp", "rupee",
        ],
    ),
    (
        "sports",
        &[
            "cricket", "football", "ipl", "tournament", "olympics", "world cup", "wicket",
            "stadium", "championship", "player", "medal",
        ],
    ),
    (
        "entertainment",
        &[
            "movie", "film", "actor", "bollywood", "music", "celebrity", "box office",
            "trailer", "concert", "web series",
        ],
    ),
    (
        "education",
        &[
            "school", "university", "exam", "student", "education", "college", "neet",
            "upsc", "scholarship", "curriculum",
        ],
    ),
    (
        "social",
        &[
            "social media", "viral", "influencer", "twitter", "instagram", "whatsapp",
            "facebook", "youtube", "trending",
        ],
    ),
];

/// Classify a blob of article text (typically title + description) into one
/// taxonomy category.
pub fn classify(text: &str) -> &'static str {
    let lower = text.to_lowercase();

    if POLITICS_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return POLITICS;
    }

    let mut best = GENERAL;
    let mut best_hits = 0;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let hits = keywords.iter().filter(|k| lower.contains(*k)).count();
        if hits > best_hits {
            best = category;
            best_hits = hits;
        }
    }
    best
}
