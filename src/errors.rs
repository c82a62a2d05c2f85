use axum::response::IntoResponse;
use http::StatusCode;
use thiserror::Error;

use crate::external::quote_provider::QuoteError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Portfolio '{0}' already exists")]
    DuplicatePortfolio(String),
    #[error("Not enough shares of {symbol} to sell. Available: {held}, Requested: {requested}")]
    InsufficientShares {
        symbol: String,
        held: i64,
        requested: i64,
    },
    #[error("Quote lookup failed: {0}")]
    Quote(#[from] QuoteError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AppError::DuplicatePortfolio(_) => {
                (StatusCode::CONFLICT, self.to_string()).into_response()
            }
            AppError::InsufficientShares { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
            }
            AppError::Quote(_) => (StatusCode::BAD_GATEWAY, self.to_string()).into_response(),
            AppError::Db(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
