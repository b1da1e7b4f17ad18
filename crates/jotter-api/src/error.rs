use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use jotter_auth::AuthError;
use jotter_db::StoreError;
use jotter_types::api::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed field, unparseable body or path.
    #[error("{0}")]
    Validation(String),
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Conflict(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(anyhow::Error),
    #[error("hashing error: {0}")]
    Hashing(String),
    #[error("signing error: {0}")]
    Signing(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidCredentials | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_)
            | ApiError::Hashing(_)
            | ApiError::Signing(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Turn a store error into an API error, naming the missing resource.
    pub(crate) fn from_store(err: StoreError, resource: &str) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound(format!("{resource} not found")),
            other => other.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("record not found".into()),
            StoreError::Conflict { field } => {
                ApiError::Conflict(format!("user with this {field} already exists"))
            }
            StoreError::Storage(e) => ApiError::Storage(e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hashing(e) => ApiError::Hashing(e),
            AuthError::Signing(e) => ApiError::Signing(e),
            AuthError::Unauthorized => ApiError::Unauthorized,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("invalid payload: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(format!("invalid ID: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Infrastructure detail goes to the log, never to the client.
        let message = if status.is_server_error() {
            error!("{}", self);
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiResponse::message(message))).into_response()
    }
}

/// Reject empty or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(())
}
