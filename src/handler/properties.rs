use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::{
    dtos::{
        propertydtos::{CreatePropertyDto, ListingQueryDto, UpdatePropertyDto},
        userdtos::Response,
    },
    error::HttpError,
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::usermodel::UserRole,
    AppState,
};

pub fn property_handler() -> Router {
    let public = Router::new()
        .route("/", get(search_properties))
        .route("/:property_id", get(get_property));

    let protected = Router::new()
        .route("/", post(create_property))
        .route("/my", get(get_my_properties))
        .route(
            "/stats",
            get(get_dashboard_stats).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserRole::Admin])
            })),
        )
        .route(
            "/:property_id",
            put(update_property).delete(delete_property),
        )
        .layer(middleware::from_fn(auth));

    public.merge(protected)
}

pub async fn search_properties(
    Query(query_params): Query<ListingQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let page = app_state.property_service.search(&query_params).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": page
    })))
}

pub async fn get_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state.property_service.view(property_id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .property_service
        .create(&user.user, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "message": "Property created successfully",
            "data": {
                "property": property
            }
        })),
    ))
}

pub async fn get_my_properties(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state
        .property_service
        .my_properties(&user.user)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "properties": properties,
            "total": properties.len()
        }
    })))
}

pub async fn update_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .property_service
        .update(&user.user, property_id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "property": property
        }
    })))
}

pub async fn delete_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .property_service
        .delete(&user.user, property_id)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: "Property deleted successfully.".to_string(),
    }))
}

pub async fn get_dashboard_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.report_service.dashboard_stats().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": {
            "stats": stats
        }
    })))
}
