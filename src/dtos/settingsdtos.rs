use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use validator::Validate;

use crate::models::settingsmodel::{Setting, SettingCategory};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertSettingDto {
    #[validate(length(min = 1, max = 100, message = "Setting key is required"))]
    pub key: String,

    pub value: JsonValue,

    #[serde(default)]
    pub category: SettingCategory,

    pub description: Option<String>,

    #[serde(rename = "isPublic", alias = "is_public", default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BulkSettingsDto {
    #[validate]
    pub settings: Vec<UpsertSettingDto>,
}

/// Collapses setting records into the `{ key: value }` object clients read.
pub fn settings_map(settings: Vec<Setting>) -> Map<String, JsonValue> {
    settings
        .into_iter()
        .map(|setting| (setting.key, setting.value.0))
        .collect()
}
