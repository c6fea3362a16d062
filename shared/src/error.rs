use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    ReservationConflict(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ForbiddenOperation(String),
    #[error("authorization token was not provided")]
    UnauthorizedError,
    #[error("invalid or expired token")]
    UnauthenticatedError,
    #[error("database operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("{0}")]
    RedisError(#[from] redis::RedisError),
    #[error("{0}")]
    IdentityProviderError(#[from] reqwest::Error),
    #[error("{0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("{0}")]
    ConversionEntityError(String),
}

// 不正なリクエストボディも {"error": ...} の形で 400 を返す
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

// ID はパス上では不透明な文字列として扱い、解釈できないものは存在しない扱いとする
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(_) => {
                AppError::EntityNotFound("the requested resource was not found".into())
            }
            other => AppError::InvalidInput(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            AppError::InvalidInput(_)
            | AppError::ValidationError(_)
            | AppError::ReservationConflict(_)
            | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ForbiddenOperation(_) => StatusCode::FORBIDDEN,
            AppError::UnauthorizedError | AppError::UnauthenticatedError => {
                StatusCode::UNAUTHORIZED
            }
            e @ (AppError::SpecificOperationError(_)
            | AppError::RedisError(_)
            | AppError::IdentityProviderError(_)
            | AppError::SerializationError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // 内部エラーの詳細はクライアントに返さない
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
