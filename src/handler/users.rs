use std::sync::Arc;

use axum::{
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        AdminUpdateUserDto, FilterUserDto, Response, UserData, UserListResponseDto,
        UserResponseDto,
    },
    error::HttpError,
    handler::auth::email_conflict,
    middleware::role_check,
    models::usermodel::{User, UserRole},
    AppState,
};

/// Administrator-only account management; the caller nests this behind `auth`.
pub fn users_handler() -> Router {
    Router::new()
        .route("/", get(get_users))
        .route(
            "/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/:user_id/toggle", patch(toggle_user))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

fn user_not_found() -> HttpError {
    HttpError::not_found("User not found.")
}

fn user_response(user: &User) -> Json<UserResponseDto> {
    Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(user),
        },
    })
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state.db_client.get_users().await?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        results: users.len(),
    }))
}

pub async fn get_user(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(user_response(&user))
}

pub async fn update_user(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<AdminUpdateUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .admin_update_user(user_id, body)
        .await
        .map_err(email_conflict)?
        .ok_or_else(user_not_found)?;

    tracing::info!("User {} updated by an administrator", user.id);
    Ok(user_response(&user))
}

pub async fn delete_user(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    if !app_state.db_client.delete_user(user_id).await? {
        return Err(user_not_found());
    }

    tracing::info!("User {} deleted", user_id);
    Ok(Json(Response {
        status: "success",
        message: "User deleted.".to_string(),
    }))
}

pub async fn toggle_user(
    Path(user_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .toggle_user_active(user_id)
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!("User {} is_active now {}", user.id, user.is_active);
    Ok(user_response(&user))
}
