use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn message_not_found(id: i64) -> Self {
        Self::not_found(format!("Message with id {} not found", id))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message) = match self {
            ApiError::Database(message) => {
                tracing::error!("Database error: {}", message);
                // Storage failures are reported verbatim
                ("DATABASE_ERROR", message)
            }
            ApiError::Validation(message) => {
                tracing::debug!("Validation error: {}", message);
                ("VALIDATION_ERROR", message)
            }
            ApiError::UnsupportedMediaType(message) => {
                tracing::debug!("Unsupported media type: {}", message);
                ("UNSUPPORTED_MEDIA_TYPE", message)
            }
            ApiError::NotFound(message) => {
                tracing::debug!("Resource not found: {}", message);
                ("NOT_FOUND", message)
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal server error: {:#}", err);
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// Request body extraction failures
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType("Content-Type must be application/json".to_string())
            }
            other => ApiError::Validation(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

// PostgreSQL error mapping
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.code() {
            Some(&SqlState::CHECK_VIOLATION) => {
                ApiError::Validation("Data validation constraint violated".to_string())
            }
            Some(&SqlState::NOT_NULL_VIOLATION) => {
                ApiError::Validation("Required field 'content' is missing".to_string())
            }
            Some(&SqlState::INVALID_TEXT_REPRESENTATION)
            | Some(&SqlState::CHARACTER_NOT_IN_REPERTOIRE) => {
                ApiError::Validation("Invalid data format provided".to_string())
            }
            Some(&SqlState::STRING_DATA_RIGHT_TRUNCATION) => {
                ApiError::Validation("Text data exceeds maximum length".to_string())
            }
            Some(&SqlState::CONNECTION_EXCEPTION)
            | Some(&SqlState::CONNECTION_DOES_NOT_EXIST)
            | Some(&SqlState::CONNECTION_FAILURE) => {
                tracing::error!("PostgreSQL connection error: {}", err);
                ApiError::Database(err.to_string())
            }
            _ => {
                tracing::error!("PostgreSQL error: {} (code: {:?})", err, err.code());
                ApiError::Database(err.to_string())
            }
        }
    }
}

// Connection pool error mapping
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        match err {
            deadpool_postgres::PoolError::Timeout(_) => {
                tracing::warn!("Database connection pool timeout: {}", err);
                ApiError::Database(err.to_string())
            }
            deadpool_postgres::PoolError::NoRuntimeSpecified => {
                tracing::error!("Database pool runtime error: {}", err);
                ApiError::Internal(anyhow::anyhow!("Database configuration error: {}", err))
            }
            _ => {
                tracing::error!("Database connection pool error: {}", err);
                ApiError::Database(err.to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
