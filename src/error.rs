//! Error taxonomy shared by the store, the date policy, and the HTTP layer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("invalid date")]
    InvalidDate,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidDate => {
                (StatusCode::BAD_REQUEST, "Fecha inválida").into_response()
            }
            AppError::Io(e) => {
                tracing::error!("Store I/O error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor").into_response()
            }
            AppError::Parse(e) => {
                tracing::error!("Store contents are not valid JSON: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor").into_response()
            }
        }
    }
}
