// db/reportdb.rs
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::reportmodel::{Report, ReportType, ReportWithAuthor};

#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub report_type: ReportType,
    pub description: Option<String>,
    pub data: JsonValue,
    pub filters: Option<JsonValue>,
    pub generated_by: Uuid,
}

const REPORT_SELECT: &str = r#"
    SELECT r.*, u.name AS author_name, u.email AS author_email
    FROM reports r
    LEFT JOIN users u ON u.id = r.generated_by"#;

#[async_trait]
pub trait ReportExt {
    async fn create_report(&self, report: NewReport) -> Result<Report, sqlx::Error>;

    /// Newest first, with the generating user's name and email.
    async fn get_reports(&self) -> Result<Vec<ReportWithAuthor>, sqlx::Error>;

    async fn get_report(&self, report_id: Uuid) -> Result<Option<ReportWithAuthor>, sqlx::Error>;

    async fn delete_report(&self, report_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl ReportExt for DBClient {
    async fn create_report(&self, report: NewReport) -> Result<Report, sqlx::Error> {
        sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (title, report_type, description, data, filters, generated_by, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'completed')
            RETURNING *
            "#,
        )
        .bind(report.title)
        .bind(report.report_type)
        .bind(report.description)
        .bind(Json(report.data))
        .bind(report.filters.map(Json))
        .bind(report.generated_by)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_reports(&self) -> Result<Vec<ReportWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReportWithAuthor>(&format!(
            "{} ORDER BY r.created_at DESC",
            REPORT_SELECT
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_report(&self, report_id: Uuid) -> Result<Option<ReportWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, ReportWithAuthor>(&format!("{} WHERE r.id = $1", REPORT_SELECT))
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn delete_report(&self, report_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(report_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
