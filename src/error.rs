use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Faltan campos requeridos")]
    MissingFields,

    #[error("Acción inválida")]
    InvalidAction,

    #[error("Card no encontrada")]
    CardNotFound,

    #[error("{0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Storage(Box::new(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(Box::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MissingFields | AppError::InvalidAction => StatusCode::BAD_REQUEST,
            AppError::CardNotFound => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The front-end reads `message` on a miss and `error` everywhere else.
        let body = match status {
            StatusCode::NOT_FOUND => json!({ "message": self.to_string() }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
