use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::settingsdb::SettingsExt,
    dtos::{
        settingsdtos::{settings_map, BulkSettingsDto, UpsertSettingDto},
        userdtos::Response,
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

/// Reads are open to any signed-in user; writes need an administrator.
pub fn settings_handler() -> Router {
    let admin_only = Router::new()
        .route("/", post(upsert_setting))
        .route("/bulk", post(upsert_settings))
        .route("/:key", delete(delete_setting))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }));

    Router::new()
        .route("/", get(get_settings))
        .merge(admin_only)
}

pub async fn get_settings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let include_private = user.user.role == UserRole::Admin;
    let settings = app_state.db_client.get_settings(include_private).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "settings": settings_map(settings)
        }
    })))
}

pub async fn upsert_setting(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpsertSettingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let setting = app_state
        .db_client
        .upsert_setting(user.user.id, body)
        .await?;

    tracing::info!("Setting '{}' updated by {}", setting.key, user.user.id);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "setting": setting
        }
    })))
}

pub async fn upsert_settings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<BulkSettingsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let saved = app_state
        .db_client
        .upsert_settings(user.user.id, body.settings)
        .await?;

    tracing::info!("{} settings updated by {}", saved.len(), user.user.id);

    Ok(Json(Response {
        status: "success",
        message: "Settings updated.".to_string(),
    }))
}

pub async fn delete_setting(
    Path(key): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    if !app_state.db_client.delete_setting(&key).await? {
        return Err(HttpError::not_found(format!("Setting '{}' not found.", key)));
    }

    Ok(Json(Response {
        status: "success",
        message: "Setting deleted.".to_string(),
    }))
}
