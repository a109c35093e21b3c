use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
}

/// /api 下的存活探针，前端轮询用
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn root() -> &'static str {
    "Stock screener backend"
}

async fn healthz() -> &'static str {
    "ok"
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
