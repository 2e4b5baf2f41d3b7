use thiserror::Error;
use uuid::Uuid;
use crate::error::{ErrorMessage, HttpError};
use axum::http::StatusCode;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Property {0} not found")]
    PropertyNotFound(Uuid),

    #[error("Report {0} not found")]
    ReportNotFound(Uuid),

    #[error("User {user_id} is not authorized to modify property {property_id}")]
    NotPropertyOwner { user_id: Uuid, property_id: Uuid },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        match error {
            // store failures are logged, never echoed to the client
            ServiceError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            ServiceError::Serialization(ref e) => {
                tracing::error!("Serialization error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            ServiceError::Hashing(ref e) => {
                tracing::error!("Hashing error: {}", e);
                HttpError::server_error(ErrorMessage::HashingError.to_string())
            }
            _ => HttpError::new(error.to_string(), status),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::PropertyNotFound(_)
            | ServiceError::ReportNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::NotPropertyOwner { .. } => StatusCode::FORBIDDEN,

            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::Database(_)
            | ServiceError::Serialization(_)
            | ServiceError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
