use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::handler::error::AppError;
use crate::models::Stock;

/// 单只股票快照，无数据返回 404
pub async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Stock>, AppError> {
    state
        .screener
        .quote(&symbol)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Stock not found".to_string()))
}
