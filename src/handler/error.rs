use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::watchlist::WatchlistError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

impl From<WatchlistError> for AppError {
    fn from(e: WatchlistError) -> Self {
        match e {
            WatchlistError::NotFound(_) => AppError::NotFound(e.to_string()),
            WatchlistError::InvalidSymbol(_)
            | WatchlistError::Duplicate(_)
            | WatchlistError::Full => AppError::BadRequest(e.to_string()),
            WatchlistError::Storage(_) | WatchlistError::Encode(_) => {
                tracing::error!("watchlist storage failure: {}", e);
                AppError::Internal(e.to_string())
            }
        }
    }
}
