//! Persistence of triaged reports.
//!
//! The assistant only ever inserts rows and, for clients building a
//! duplicate window, reads the newest ones back. Both operations sit behind
//! [`ReportStore`] so the pipeline can run against PostgreSQL in Lambda and
//! against memory in tests.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{now_timestamp, Coordinates, ImageObject, Priority, RecentReportRef};
use crate::Result;

/// Title stored when the citizen left it blank.
pub const UNTITLED_REPORT: &str = "Untitled Report";

/// A triaged report ready to be written to the `reports` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub priority_score: f64,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub images: Vec<String>,
    pub auto_description: Option<String>,
    pub image_objects: Vec<ImageObject>,
    pub fraud_score: f64,
    pub fraud_reasons: Vec<String>,
    pub auto_rejected: bool,
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist one triaged report.
    async fn insert_report(&self, report: &NewReport) -> Result<()>;

    /// Newest persisted reports first, at most `limit` of them.
    async fn recent_reports(&self, limit: i64) -> Result<Vec<RecentReportRef>>;
}

/// PostgreSQL-backed store.
///
/// Expects a `reports` table with `coordinates` and `image_objects` as jsonb,
/// `images` and `fraud_reasons` as text[], and a defaulted `created_at`.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type RecentRow = (
    Uuid,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<Json<Coordinates>>,
    Vec<String>,
    DateTime<Utc>,
);

#[async_trait]
impl ReportStore for PgReportStore {
    async fn insert_report(&self, report: &NewReport) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reports (
                id, user_id, title, description, category, priority, priority_score,
                address, coordinates, images, auto_description, image_objects,
                fraud_score, fraud_reasons, auto_rejected
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(report.id)
        .bind(&report.user_id)
        .bind(&report.title)
        .bind(&report.description)
        .bind(&report.category)
        .bind(report.priority.as_str())
        .bind(report.priority_score)
        .bind(&report.address)
        .bind(report.coordinates.map(Json))
        .bind(&report.images)
        .bind(&report.auto_description)
        .bind(Json(&report.image_objects))
        .bind(report.fraud_score)
        .bind(&report.fraud_reasons)
        .bind(report.auto_rejected)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<RecentReportRef>> {
        let rows: Vec<RecentRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, address, coordinates, images, created_at
            FROM reports
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, description, address, coordinates, images, created_at)| RecentReportRef {
                id: id.to_string(),
                title,
                description,
                address,
                coordinates: coordinates.map(|Json(c)| c),
                images,
                timestamp: Some(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            })
            .collect())
    }
}

/// In-process store for local runs and tests.
#[derive(Default)]
pub struct MemoryReportStore {
    rows: RwLock<Vec<(NewReport, String)>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything inserted so far, oldest first.
    pub async fn reports(&self) -> Vec<NewReport> {
        self.rows.read().await.iter().map(|(r, _)| r.clone()).collect()
    }
}

#[async_trait]
impl ReportStore for MemoryReportStore {
    async fn insert_report(&self, report: &NewReport) -> Result<()> {
        self.rows.write().await.push((report.clone(), now_timestamp()));
        Ok(())
    }

    async fn recent_reports(&self, limit: i64) -> Result<Vec<RecentReportRef>> {
        let rows = self.rows.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(rows
            .iter()
            .rev()
            .take(limit)
            .map(|(report, timestamp)| RecentReportRef {
                id: report.id.to_string(),
                title: Some(report.title.clone()),
                description: Some(report.description.clone()),
                address: report.address.clone(),
                coordinates: report.coordinates,
                images: report.images.clone(),
                timestamp: Some(timestamp.clone()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str) -> NewReport {
        NewReport {
            id: Uuid::new_v4(),
            user_id: "citizen-7".to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Other".to_string(),
            priority: Priority::Medium,
            priority_score: 0.4,
            address: None,
            coordinates: None,
            images: Vec::new(),
            auto_description: None,
            image_objects: Vec::new(),
            fraud_score: 0.0,
            fraud_reasons: Vec::new(),
            auto_rejected: false,
        }
    }

    #[tokio::test]
    async fn test_memory_store_returns_newest_first() {
        let store = MemoryReportStore::new();
        for title in ["first", "second", "third"] {
            store.insert_report(&row(title)).await.unwrap();
        }

        let recent = store.recent_reports(2).await.unwrap();
        let titles: Vec<_> = recent.iter().map(|r| r.title.as_deref().unwrap()).collect();
        assert_eq!(titles, vec!["third", "second"]);
        assert!(recent.iter().all(|r| r.timestamp.is_some()));
    }

    #[tokio::test]
    async fn test_memory_store_negative_limit_is_empty() {
        let store = MemoryReportStore::new();
        store.insert_report(&row("only")).await.unwrap();
        assert!(store.recent_reports(-1).await.unwrap().is_empty());
        assert_eq!(store.reports().await.len(), 1);
    }
}
