use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "setting_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SettingCategory {
    #[default]
    General,
    Payment,
    Email,
    Seo,
    Appearance,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: Uuid,
    pub key: String,
    pub value: Json<JsonValue>,
    pub category: SettingCategory,
    pub description: Option<String>,
    pub is_public: bool,
    pub updated_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
