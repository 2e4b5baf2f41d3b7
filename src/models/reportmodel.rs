use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// Kind of report to generate. Unrecognised names deserialize as `Custom`,
/// which produces an empty payload.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "report_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    Sales,
    Inventory,
    UserActivity,
    Revenue,
    #[default]
    #[serde(other)]
    Custom,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "report_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub description: Option<String>,
    pub data: Json<JsonValue>,
    pub filters: Option<Json<JsonValue>>,
    pub generated_by: Uuid,
    pub status: ReportStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Default)]
pub struct ReportAuthor {
    #[sqlx(rename = "author_name")]
    pub name: Option<String>,
    #[sqlx(rename = "author_email")]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ReportWithAuthor {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub report: Report,

    #[serde(rename = "generatedByUser")]
    #[sqlx(flatten)]
    pub author: ReportAuthor,
}

/// One bucket of a `GROUP BY ... COUNT(*)` aggregation.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct CityRevenue {
    pub city: String,
    pub total: f64,
    pub count: i64,
}
