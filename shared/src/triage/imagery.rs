//! Filename-based image tagging and the generated summary line.

use crate::models::{ImageObject, ReportSubmission};

/// Substring rules: any listed needle in the lowercased identifier adds the tag.
const IMAGE_RULES: &[(&[&str], &str, f64)] = &[
    (&["pothole", "road"], "pothole", 0.8),
    (&["garbage", "waste"], "garbage", 0.8),
    (&["light"], "streetlight", 0.7),
    (&["water", "pipe"], "water_issue", 0.7),
];

const FALLBACK_LABEL: &str = "general_issue";
const FALLBACK_CONFIDENCE: f64 = 0.6;
const MAX_DESCRIPTION_CHARS: usize = 300;

/// Tag each image by its identifier. Rules are independent, so one image can
/// produce several tags. If images exist but none matched, a single
/// `general_issue` tag is returned.
pub fn tag_images(images: &[String]) -> Vec<ImageObject> {
    if images.is_empty() {
        return Vec::new();
    }

    let mut objects = Vec::new();
    for image in images {
        let lower = image.to_lowercase();
        for (needles, label, confidence) in IMAGE_RULES {
            if needles.iter().any(|n| lower.contains(n)) {
                objects.push(ImageObject::new(*label, *confidence));
            }
        }
    }

    if objects.is_empty() {
        objects.push(ImageObject::new(FALLBACK_LABEL, FALLBACK_CONFIDENCE));
    }
    objects
}

/// One-line summary for officials, capped at 300 characters.
pub fn describe(report: &ReportSubmission, category: &str) -> String {
    let title = report.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Issue");
    let location = report.address().unwrap_or("reported location");

    format!(
        "{} issue reported: {} at {}. Requires attention from local authorities.",
        category, title, location
    )
    .chars()
    .take(MAX_DESCRIPTION_CHARS)
    .collect()
}
