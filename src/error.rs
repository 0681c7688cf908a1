use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::model::PayloadError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid payload: {0}")]
    Validation(String),

    #[error("car `{0}` not found")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Storage(e) => {
                log::error!("storage error: {}", e);
                "Failed to access car storage".to_string()
            }
            other => {
                log::warn!("{}", other);
                other.to_string()
            }
        };

        HttpResponse::build(status).json(json!({
            "error": message,
            "status": status.as_u16()
        }))
    }
}
