use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response as AxumResponse},
    routing::{get, post, put},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use serde_json::json;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::userdtos::{
        ChangePasswordDto, FilterUserDto, LoginUserDto, RegisterUserDto, UpdateProfileDto,
        UserData, UserLoginResponseDto, UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    middleware::{auth, JWTAuthMiddeware},
    models::usermodel::{User, UserRole},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    let protected = Router::new()
        .route("/me", get(get_me))
        .route("/profile", put(update_profile))
        .route("/password", put(change_password))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

/// Maps a unique-key violation on `users.email` to 409.
pub fn email_conflict(error: sqlx::Error) -> HttpError {
    match &error {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            HttpError::unique_constraint_violation(ErrorMessage::EmailExist.to_string())
        }
        _ => error.into(),
    }
}

fn issue_token(app_state: &AppState, user: &User) -> Result<String, HttpError> {
    token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token for {}: {}", user.id, e);
        HttpError::server_error(ErrorMessage::ServerError.to_string())
    })
}

fn with_token_cookie(
    app_state: &AppState,
    token: &str,
    mut response: AxumResponse,
) -> Result<AxumResponse, HttpError> {
    let cookie = Cookie::build(("token", token.to_owned()))
        .path("/")
        .max_age(time::Duration::minutes(app_state.env.jwt_maxage))
        .http_only(true)
        .build();

    let value = cookie
        .to_string()
        .parse()
        .map_err(|_| HttpError::server_error(ErrorMessage::ServerError.to_string()))?;
    response.headers_mut().append(header::SET_COOKIE, value);

    Ok(response)
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await?;

    if existing_user.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::EmailExist.to_string(),
        ));
    }

    let hashed_password = password::hash(&body.password)
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(body.name, body.email, hashed_password, body.phone, UserRole::User)
        .await
        .map_err(email_conflict)?;

    let token = issue_token(&app_state, &user)?;
    tracing::info!("User registered: {}", user.email);

    let response = (
        StatusCode::CREATED,
        Json(UserLoginResponseDto {
            status: "success".to_string(),
            token: token.clone(),
            data: UserData {
                user: FilterUserDto::filter_user(&user),
            },
        }),
    )
        .into_response();

    with_token_cookie(&app_state, &token, response)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()));
    }

    if !user.is_active {
        return Err(HttpError::unauthorized(ErrorMessage::AccountDeactivated.to_string()));
    }

    let token = issue_token(&app_state, &user)?;
    tracing::info!("User logged in: {}", user.email);

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token: token.clone(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    })
    .into_response();

    with_token_cookie(&app_state, &token, response)
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user.user),
        },
    }))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let updated = app_state
        .db_client
        .update_profile(user.user.id, body)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn change_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = user.user;

    let password_matched = password::compare(&body.current_password, &user.password)
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request("Current password is incorrect."));
    }

    let hashed_password = password::hash(&body.new_password)
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .update_user_password(user.id, hashed_password)
        .await?;

    let token = issue_token(&app_state, &user)?;
    tracing::info!("Password changed for {}", user.email);

    let response = Json(json!({
        "status": "success",
        "message": "Password changed successfully.",
        "token": token,
    }))
    .into_response();

    with_token_cookie(&app_state, &token, response)
}
