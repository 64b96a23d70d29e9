//! Additive keyword priority scorer.

use super::combined_text;
use crate::models::Priority;

const BASE_SCORE: f64 = 0.4;
const IMAGE_BONUS: f64 = 0.1;

/// Keyword tiers and the weight each matching keyword adds.
pub const PRIORITY_TIERS: &[(f64, &[&str])] = &[
    (
        0.3,
        &["emergency", "urgent", "dangerous", "broken", "accident", "injury", "flood"],
    ),
    (0.2, &["major", "severe", "large", "blocking", "traffic"]),
    (0.1, &["moderate", "issue", "problem", "concern"]),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityAssessment {
    pub priority: Priority,
    pub score: f64,
}

/// Score a report's urgency.
///
/// Starts at 0.4, adds each matching keyword's tier weight (matches stack),
/// adds 0.1 when any image is attached, then clamps to `[0, 1]`.
pub fn score(title: &str, description: &str, images: &[String]) -> PriorityAssessment {
    let text = combined_text(title, description);

    let mut score = BASE_SCORE;
    for (weight, keywords) in PRIORITY_TIERS {
        let hits = keywords.iter().filter(|k| text.contains(*k)).count();
        score += weight * hits as f64;
    }
    if !images.is_empty() {
        score += IMAGE_BONUS;
    }

    let score = score.clamp(0.0, 1.0);
    PriorityAssessment {
        priority: Priority::from_score(score),
        score,
    }
}
