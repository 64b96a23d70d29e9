//! Bag-of-words duplicate detection against the caller's recent window.

use std::collections::HashSet;

use crate::models::{RecentReportRef, ReportSubmission};

/// Average text similarity that alone marks a duplicate.
pub const TEXT_THRESHOLD: f64 = 0.85;
/// Lower bar that applies when the addresses also match.
pub const CORROBORATED_THRESHOLD: f64 = 0.70;

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    pub duplicate_of: String,
    pub similarity: f64,
}

/// Jaccard similarity of the lowercased whitespace-separated word sets.
/// Empty input on either side scores 0, and so does whitespace-only text,
/// since it yields no words at all.
pub fn jaccard(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let left: HashSet<&str> = a.split_whitespace().collect();
    let right: HashSet<&str> = b.split_whitespace().collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

fn same_address(report: &ReportSubmission, candidate: &RecentReportRef) -> bool {
    match (report.address.as_deref(), candidate.address.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => a.to_lowercase() == b.to_lowercase(),
        _ => false,
    }
}

/// Scan `recent` in order and return the first report that qualifies as a
/// duplicate of `report`.
///
/// Note the scan stops at the first qualifying candidate, even if a later
/// one is more similar.
pub fn find_duplicate(report: &ReportSubmission, recent: &[RecentReportRef]) -> Option<DuplicateMatch> {
    recent.iter().find_map(|candidate| {
        let title = jaccard(report.title_or_empty(), candidate.title.as_deref().unwrap_or(""));
        let description = jaccard(
            report.description_or_empty(),
            candidate.description.as_deref().unwrap_or(""),
        );
        let similarity = (title + description) / 2.0;

        let qualifies = similarity >= TEXT_THRESHOLD
            || (same_address(report, candidate) && similarity >= CORROBORATED_THRESHOLD);

        qualifies.then(|| DuplicateMatch {
            duplicate_of: candidate.id.clone(),
            similarity,
        })
    })
}
