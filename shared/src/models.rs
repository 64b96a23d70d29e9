//! Wire models for the assistant endpoint.
//!
//! Field names follow the JSON contract the web client already speaks
//! (snake_case, absent optionals serialized as `null`).

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use validator::Validate;

use crate::{Error, Result};

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Current time in the format stamped onto every response.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinates {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

/// A citizen's report as captured by the web form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReportSubmission {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ReportSubmission {
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Address, with an empty string counted as absent.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }
}

/// A previously submitted report, supplied by the caller as duplicate context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentReportRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Event discriminator sent by the web client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    NewReport,
    ImageUpload,
    SignupClick,
    AboutHelpRequest,
    AdminLogin,
    #[default]
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Events that carry a report and run the triage pipeline.
    pub fn is_report_bearing(self) -> bool {
        matches!(self, EventKind::NewReport | EventKind::ImageUpload)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::NewReport => "new_report",
            EventKind::ImageUpload => "image_upload",
            EventKind::SignupClick => "signup_click",
            EventKind::AboutHelpRequest => "about_help_request",
            EventKind::AdminLogin => "admin_login",
            EventKind::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Citizen,
    Guest,
    Administration,
    MunicipalityHead,
}

/// Request body accepted by the assistant endpoint.
///
/// `report` and `recent_reports` stay as raw JSON until a report-bearing
/// event asks for them, so other events never fail on a payload they ignore.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub event: EventKind,
    #[serde(default)]
    pub report: Option<Value>,
    #[serde(default)]
    pub recent_reports: Option<Value>,
    #[serde(default)]
    pub user_role: Option<UserRole>,
    #[serde(default)]
    pub ui_version: Option<String>,
}

impl AssistantRequest {
    /// The submitted report. Missing or malformed data is an input error.
    pub fn submission(&self) -> Result<ReportSubmission> {
        match &self.report {
            None | Some(Value::Null) => Err(Error::InvalidReport(format!(
                "Report data is required for {} events",
                self.event
            ))),
            Some(raw) => ReportSubmission::deserialize(raw)
                .map_err(|e| Error::InvalidReport(format!("Invalid report: {}", e))),
        }
    }

    /// The caller's duplicate window; absent means empty.
    pub fn recent_window(&self) -> Result<Vec<RecentReportRef>> {
        match &self.recent_reports {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(raw) => Vec::<RecentReportRef>::deserialize(raw)
                .map_err(|e| Error::InvalidReport(format!("Invalid recent_reports: {}", e))),
        }
    }
}

/// Priority band derived from a priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Map a score to its band. Each band includes its lower bound.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Priority::Urgent
        } else if score >= 0.65 {
            Priority::High
        } else if score >= 0.40 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// A pseudo object-detection tag attached to a report's images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub label: String,
    pub confidence: f64,
}

impl ImageObject {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Hints telling the web client which elements to show or hide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiActions {
    pub show_signup_modal: Vec<String>,
    pub hide_elements_on_admin_login: Vec<String>,
    pub about_content: Option<String>,
    pub help_content: Option<String>,
}

/// Outcome of one assistant invocation: the triage decision for a report,
/// or UI hints with neutral triage fields for every other event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageDecision {
    pub status: ResponseStatus,
    pub error_message: Option<String>,
    pub report_id: Option<String>,
    pub category: String,
    pub category_confidence: f64,
    pub priority: Priority,
    pub priority_score: f64,
    pub duplicate: bool,
    pub duplicate_of: Option<String>,
    pub auto_description: Option<String>,
    pub image_objects: Vec<ImageObject>,
    pub ocr_text: Option<String>,
    pub address: Option<String>,
    pub coordinates_returned: Option<Coordinates>,
    pub need_reverse_geocode: bool,
    pub fraud_score: f64,
    pub fraud_reasons: Vec<String>,
    pub auto_reject: bool,
    pub ui_actions: UiActions,
    pub explainability: Option<String>,
    pub timestamp: String,
}

impl TriageDecision {
    /// Successful response with neutral triage fields.
    pub fn neutral() -> Self {
        Self {
            status: ResponseStatus::Success,
            error_message: None,
            report_id: None,
            category: "Other".to_string(),
            category_confidence: 0.5,
            priority: Priority::Medium,
            priority_score: 0.5,
            duplicate: false,
            duplicate_of: None,
            auto_description: None,
            image_objects: Vec::new(),
            ocr_text: None,
            address: None,
            coordinates_returned: None,
            need_reverse_geocode: false,
            fraud_score: 0.0,
            fraud_reasons: Vec::new(),
            auto_reject: false,
            ui_actions: UiActions::default(),
            explainability: None,
            timestamp: now_timestamp(),
        }
    }

    /// Error response with every score at its safe floor.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            error_message: Some(message.into()),
            category_confidence: 0.0,
            priority: Priority::Low,
            priority_score: 0.0,
            ..Self::neutral()
        }
    }
}
