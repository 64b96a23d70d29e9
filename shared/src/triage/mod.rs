//! Heuristic triage of incoming civic reports.
//!
//! Every stage is a pure function over the submission (and, where relevant,
//! the caller-supplied window of recent reports). Keyword tables are plain
//! data so they can be extended without touching the scoring code.

pub mod category;
pub mod duplicates;
pub mod fraud;
pub mod imagery;
pub mod priority;

pub use category::{classify, CategoryMatch};
pub use duplicates::{find_duplicate, DuplicateMatch};
pub use fraud::{is_auto_reject, screen, FraudAssessment};
pub use imagery::{describe, tag_images};
pub use priority::{score, PriorityAssessment};

/// Title and description joined by a space and lowercased.
pub(crate) fn combined_text(title: &str, description: &str) -> String {
    format!("{} {}", title, description).to_lowercase()
}
