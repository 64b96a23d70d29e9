//! Low-quality and spam screening.

use super::combined_text;
use crate::models::{RecentReportRef, ReportSubmission};

/// Fraud score at or above which a report is suppressed.
pub const AUTO_REJECT_THRESHOLD: f64 = 0.90;

pub const VERY_SHORT_DESCRIPTION: &str = "very_short_description";
pub const DUPLICATE_TEXT_ACROSS_REPORTS: &str = "duplicate_text_across_reports";
pub const TEST_CONTENT_DETECTED: &str = "test_content_detected";

const SHORT_TEXT_LEN: usize = 10;
const TEST_TEXT_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FraudAssessment {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl FraudAssessment {
    fn flag(&mut self, weight: f64, reason: &str) {
        self.score += weight;
        self.reasons.push(reason.to_string());
    }
}

fn repeats_recent_text(report: &ReportSubmission, recent: &[RecentReportRef]) -> bool {
    recent.iter().any(|r| {
        (report.description.is_some() && r.description == report.description)
            || (report.title.is_some() && r.title == report.title)
    })
}

/// Score how likely the submission is junk. Rules are independent and
/// additive; the total is capped at 1.
pub fn screen(report: &ReportSubmission, recent: &[RecentReportRef]) -> FraudAssessment {
    let text = combined_text(report.title_or_empty(), report.description_or_empty());
    let length = text.chars().count();
    let mut assessment = FraudAssessment::default();

    if length < SHORT_TEXT_LEN {
        assessment.flag(0.3, VERY_SHORT_DESCRIPTION);
    }
    if repeats_recent_text(report, recent) {
        assessment.flag(0.4, DUPLICATE_TEXT_ACROSS_REPORTS);
    }
    if text.contains("test") && length < TEST_TEXT_LEN {
        assessment.flag(0.5, TEST_CONTENT_DETECTED);
    }

    assessment.score = assessment.score.min(1.0);
    assessment
}

pub fn is_auto_reject(fraud_score: f64) -> bool {
    fraud_score >= AUTO_REJECT_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(title: Option<&str>, description: Option<&str>) -> ReportSubmission {
        ReportSubmission {
            title: title.map(String::from),
            description: description.map(String::from),
            ..Default::default()
        }
    }

    fn recent(title: &str, description: &str) -> RecentReportRef {
        RecentReportRef {
            id: "r-1".to_string(),
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_report_scores_zero() {
        let result = screen(
            &report(Some("Streetlight out"), Some("The lamp near the temple has been dark for a week")),
            &[],
        );
        assert_eq!(result, FraudAssessment::default());
    }

    #[test]
    fn test_short_description() {
        let result = screen(&report(None, Some("leak")), &[]);
        assert!((result.score - 0.3).abs() < 1e-9);
        assert_eq!(result.reasons, vec![VERY_SHORT_DESCRIPTION]);
        assert!(!is_auto_reject(result.score));
    }

    #[test]
    fn test_repeated_description() {
        let description = "Garbage has not been collected on Hill View lane for ten days";
        let result = screen(
            &report(Some("Uncollected garbage"), Some(description)),
            &[recent("Something else", description)],
        );
        assert!(result.score >= 0.4);
        assert_eq!(result.reasons, vec![DUPLICATE_TEXT_ACROSS_REPORTS]);
    }

    #[test]
    fn test_absent_fields_do_not_match() {
        let mut other = recent("", "");
        other.title = None;
        other.description = None;
        let result = screen(
            &report(None, Some("Water supply cut off in sector four since morning")),
            &[other],
        );
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_short_test_content() {
        let result = screen(&report(Some("test report"), Some("please ignore")), &[]);
        assert!((result.score - 0.5).abs() < 1e-9);
        assert_eq!(result.reasons, vec![TEST_CONTENT_DETECTED]);
    }

    #[test]
    fn test_stacked_rules_cap_and_reject() {
        let result = screen(&report(Some("test"), None), &[recent("test", "whatever")]);
        assert_eq!(result.score, 1.0);
        assert_eq!(
            result.reasons,
            vec![VERY_SHORT_DESCRIPTION, DUPLICATE_TEXT_ACROSS_REPORTS, TEST_CONTENT_DETECTED]
        );
        assert!(is_auto_reject(result.score));
    }

    #[test]
    fn test_reject_threshold_is_inclusive() {
        assert!(is_auto_reject(0.90));
        assert!(!is_auto_reject(0.89));
        assert!(!is_auto_reject(0.8));
    }

    #[test]
    fn test_repeated_test_content_reaches_threshold() {
        let description = "testing the new form";
        let result = screen(
            &report(Some("test drive"), Some(description)),
            &[recent("Earlier submission", description)],
        );
        assert_eq!(
            result.reasons,
            vec![DUPLICATE_TEXT_ACROSS_REPORTS, TEST_CONTENT_DETECTED]
        );
        assert!((result.score - 0.9).abs() < 1e-9);
        assert!(is_auto_reject(result.score));
    }
}
