//! Shared library for the Civic Fix assistant Lambda.
//!
//! This crate provides the report triage engine, its wire models, the report
//! store and the configuration/database plumbing the Lambda needs.

pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod store;
pub mod triage;

pub use assistant::Assistant;
pub use config::Config;
pub use error::{Error, Result};
pub use models::{
    AssistantRequest, Coordinates, EventKind, ImageObject, Priority, RecentReportRef,
    ReportSubmission, ResponseStatus, TriageDecision, UiActions, UserRole,
};
pub use store::{MemoryReportStore, NewReport, PgReportStore, ReportStore};
