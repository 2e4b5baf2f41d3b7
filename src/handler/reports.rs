use std::sync::Arc;

use axum::{
    extract::Path,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::{reportdtos::GenerateReportDto, userdtos::Response},
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

/// Administrator-only; the caller nests this behind `auth`.
pub fn report_handler() -> Router {
    Router::new()
        .route("/", get(get_reports).post(generate_report))
        .route("/:report_id", get(get_report).delete(delete_report))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

pub async fn generate_report(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<GenerateReportDto>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state
        .report_service
        .generate_report(user.user.id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": {
                "report": report
            }
        })),
    ))
}

pub async fn get_reports(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let reports = app_state.report_service.list_reports().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "reports": reports,
            "total": reports.len()
        }
    })))
}

pub async fn get_report(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let report = app_state.report_service.get_report(report_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "report": report
        }
    })))
}

pub async fn delete_report(
    Path(report_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    app_state.report_service.delete_report(report_id).await?;

    Ok(Json(Response {
        status: "success",
        message: "Report deleted.".to_string(),
    }))
}
