//! Keyword-ratio category classifier.

use super::combined_text;

/// Category returned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Categories in tie-break order, each with the substrings that vote for it.
pub const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Roads",
        &["pothole", "road", "street", "pavement", "crack", "damage", "traffic", "signal"],
    ),
    ("Water", &["water", "pipe", "leak", "supply", "tap", "drainage", "flood"]),
    (
        "Electricity",
        &["power", "electricity", "light", "cable", "outage", "transformer"],
    ),
    ("Sanitation", &["sewage", "drain", "toilet", "bathroom", "waste water"]),
    ("Garbage", &["garbage", "waste", "trash", "rubbish", "dump", "litter"]),
    ("Streetlight", &["streetlight", "lamp", "lighting", "dark", "bulb"]),
    ("Health", &["hospital", "clinic", "medical", "health", "medicine"]),
    ("Education", &["school", "education", "teacher", "student", "classroom"]),
];

const MIN_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryMatch {
    pub category: &'static str,
    pub confidence: f64,
}

/// Pick the category whose keyword list is most covered by the text.
///
/// Coverage is `matched / total` per category; the first category reaching
/// the highest coverage wins. Confidence is twice the coverage, clamped to
/// `[0.1, 0.95]`.
pub fn classify(title: &str, description: &str) -> CategoryMatch {
    let text = combined_text(title, description);

    let mut best = FALLBACK_CATEGORY;
    let mut best_ratio = 0.0;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        let ratio = hits as f64 / keywords.len() as f64;
        if ratio > best_ratio {
            best_ratio = ratio;
            best = *category;
        }
    }

    CategoryMatch {
        category: best,
        confidence: (best_ratio * 2.0).clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
    }
}
