use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load notification preferences";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update notification preferences";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage failure while reading preferences. The caller may retry.
    #[error("Fetch failed: {0}")]
    FetchFailed(sea_orm::DbErr),

    /// Storage failure while writing preferences.
    #[error("Update failed: {0}")]
    UpdateFailed(sea_orm::DbErr),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Remap a raw storage error into the read-path failure kind.
    pub fn fetch_failed(err: AppError) -> AppError {
        match err {
            AppError::Database(e) => AppError::FetchFailed(e),
            other => other,
        }
    }

    /// Remap a raw storage error into the write-path failure kind.
    pub fn update_failed(err: AppError) -> AppError {
        match err {
            AppError::Database(e) => AppError::UpdateFailed(e),
            other => other,
        }
    }
}

#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub message: String,
}

impl utoipa::ToSchema for AppError {
    fn name() -> std::borrow::Cow<'static, str> {
        "ErrorResponse".into()
    }
}

impl utoipa::PartialSchema for AppError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::FetchFailed(e) => {
                tracing::error!("Preference fetch failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    FETCH_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::UpdateFailed(e) => {
                tracing::error!("Preference update failed: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    UPDATE_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = json!({
            "success": false,
            "data": null,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
