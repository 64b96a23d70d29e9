//! Request orchestration for the civic assistant.
//!
//! Report-bearing events run the triage pipeline once, in order, and the
//! resulting decision is persisted only when it is not a duplicate, not
//! auto-rejected and attributable to a user. Every other event returns
//! canned UI hints.

use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::models::{AssistantRequest, EventKind, RecentReportRef, ReportSubmission, TriageDecision};
use crate::store::{NewReport, ReportStore, UNTITLED_REPORT};
use crate::triage;
use crate::Result;

/// Address placeholder returned when only coordinates were supplied.
pub const GEOCODE_REQUIRED: &str = "GEOCODE_REQUIRED";

/// Upper bound on the recent-report window a client may request.
pub const MAX_RECENT_WINDOW: i64 = 100;

pub const ABOUT_CONTENT: &str = "Jharkhand Civic Fix is a citizen-centric platform that empowers residents to report civic issues directly to local authorities. Our mission is to bridge the gap between citizens and government to create better communities across Jharkhand.";

pub const HELP_CONTENT: &str = "To report an issue: 1) Select the issue type from the dashboard 2) Fill in details with photos and location 3) Submit your report 4) Track progress via email updates. For urgent emergencies, contact local emergency services directly.";

const SIGNUP_MODAL_ROLES: &[&str] = &["administration", "municipality_head"];
const ADMIN_HIDDEN_ELEMENTS: &[&str] = &["report_issue", "about_us", "view_map", "admin_button"];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Stateless triage service over an injected report store.
pub struct Assistant<S> {
    store: S,
}

impl<S: ReportStore> Assistant<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one assistant event.
    ///
    /// Errors abort the pipeline before anything is persisted; callers turn
    /// them into [`TriageDecision::error`].
    pub async fn handle(&self, request: &AssistantRequest) -> Result<TriageDecision> {
        info!("Processing event: {}", request.event);

        if let Some(role) = request.user_role {
            info!("Event from role {:?}, ui version {:?}", role, request.ui_version);
        }

        let mut response = TriageDecision::neutral();

        match request.event {
            event if event.is_report_bearing() => {
                let report = request.submission()?;
                let recent = request.recent_window()?;
                self.process_report(&report, &recent, &mut response).await?;
            }
            EventKind::SignupClick => {
                response.ui_actions.show_signup_modal = owned(SIGNUP_MODAL_ROLES);
                response.explainability =
                    Some("Showing signup modals for admin and municipality roles".to_string());
            }
            EventKind::AboutHelpRequest => {
                response.ui_actions.about_content = Some(ABOUT_CONTENT.to_string());
                response.ui_actions.help_content = Some(HELP_CONTENT.to_string());
                response.explainability =
                    Some("Provided about and help content for user information".to_string());
            }
            EventKind::AdminLogin => {
                response.ui_actions.hide_elements_on_admin_login = owned(ADMIN_HIDDEN_ELEMENTS);
                response.explainability =
                    Some("Admin login detected - hiding citizen interface elements".to_string());
            }
            _ => {
                response.explainability =
                    Some("Processing generic event with default response".to_string());
            }
        }

        Ok(response)
    }

    async fn process_report(
        &self,
        report: &ReportSubmission,
        recent: &[RecentReportRef],
        response: &mut TriageDecision,
    ) -> Result<()> {
        report.validate()?;

        let report_id = Uuid::new_v4();
        response.report_id = Some(report_id.to_string());

        let title = report.title_or_empty();
        let description = report.description_or_empty();

        let category = triage::classify(title, description);
        response.category = category.category.to_string();
        response.category_confidence = category.confidence;

        let priority = triage::score(title, description, &report.images);
        response.priority = priority.priority;
        response.priority_score = priority.score;

        response.auto_description = Some(triage::describe(report, category.category));

        if !recent.is_empty() {
            if let Some(found) = triage::find_duplicate(report, recent) {
                info!(
                    "Report {} duplicates {} (similarity {:.2})",
                    report_id, found.duplicate_of, found.similarity
                );
                response.duplicate = true;
                response.duplicate_of = Some(found.duplicate_of);
            }
        }

        if !report.images.is_empty() {
            response.image_objects = triage::tag_images(&report.images);
        }

        let fraud = triage::screen(report, recent);
        response.auto_reject = triage::is_auto_reject(fraud.score);
        response.fraud_score = fraud.score;
        response.fraud_reasons = fraud.reasons;
        if response.auto_reject {
            warn!(
                "Report {} auto-rejected (fraud score {:.2}: {:?})",
                report_id, response.fraud_score, response.fraud_reasons
            );
        }

        match (report.coordinates, report.address()) {
            (Some(coordinates), None) => {
                response.address = Some(GEOCODE_REQUIRED.to_string());
                response.coordinates_returned = Some(coordinates);
                response.need_reverse_geocode = true;
            }
            (_, address) => {
                response.address = address.map(String::from);
                response.need_reverse_geocode = false;
            }
        }

        response.explainability = Some(format!(
            "Category: {} ({:.0}% confidence), Priority: {} based on content analysis",
            response.category,
            response.category_confidence * 100.0,
            response.priority
        ));

        if response.duplicate || response.auto_reject {
            return Ok(());
        }
        if let Some(user_id) = report.user_id.as_deref().filter(|u| !u.is_empty()) {
            let row = NewReport {
                id: report_id,
                user_id: user_id.to_string(),
                title: report
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| UNTITLED_REPORT.to_string()),
                description: description.to_string(),
                category: response.category.clone(),
                priority: response.priority,
                priority_score: response.priority_score,
                address: response.address.clone(),
                coordinates: report.coordinates,
                images: report.images.clone(),
                auto_description: response.auto_description.clone(),
                image_objects: response.image_objects.clone(),
                fraud_score: response.fraud_score,
                fraud_reasons: response.fraud_reasons.clone(),
                auto_rejected: response.auto_reject,
            };

            // Storage failures never fail the triage response.
            match self.store.insert_report(&row).await {
                Ok(()) => info!("Report saved to database: {}", report_id),
                Err(e) => error!("Failed to save report {}: {}", report_id, e),
            }
        }

        Ok(())
    }

    /// Newest persisted reports, for clients assembling `recent_reports`.
    pub async fn recent_reports(&self, limit: i64) -> Result<Vec<RecentReportRef>> {
        self.store
            .recent_reports(limit.clamp(1, MAX_RECENT_WINDOW))
            .await
    }
}
