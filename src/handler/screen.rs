use axum::{extract::State, Json};

use crate::api_models::{LargeGapScreenRequest, PredefinedScreenRequest, RangeScreenRequest};
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::models::stock::{ScreeningFilters, ScreeningResult};
use crate::services::screener::DEFAULT_LIMIT;

/// 通用筛选：请求体即筛选条件
pub async fn screen(
    State(state): State<AppState>,
    Json(filters): Json<ScreeningFilters>,
) -> Json<ScreeningResult> {
    tracing::info!(?filters, "screen request");
    Json(state.screener.screen(&filters).await)
}

/// 上游预定义筛选器，screenId 必填
pub async fn screen_predefined(
    State(state): State<AppState>,
    Json(req): Json<PredefinedScreenRequest>,
) -> Result<Json<ScreeningResult>, AppError> {
    let screen_id = req
        .screen_id
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No screener ID provided".to_string()))?;

    let limit = req.limit.unwrap_or(DEFAULT_LIMIT);
    Ok(Json(state.screener.screen_predefined(&screen_id, limit).await))
}

pub async fn screen_by_market_cap(
    State(state): State<AppState>,
    Json(req): Json<RangeScreenRequest>,
) -> Json<ScreeningResult> {
    Json(
        state
            .screener
            .screen_by_market_cap(req.min, req.max, req.limit)
            .await,
    )
}

pub async fn screen_by_pe(
    State(state): State<AppState>,
    Json(req): Json<RangeScreenRequest>,
) -> Json<ScreeningResult> {
    Json(state.screener.screen_by_pe(req.min, req.max, req.limit).await)
}

/// 股息率只有下限，max 字段接受但忽略
pub async fn screen_by_dividend(
    State(state): State<AppState>,
    Json(req): Json<RangeScreenRequest>,
) -> Json<ScreeningResult> {
    Json(
        state
            .screener
            .screen_by_dividend_yield(req.min, req.limit)
            .await,
    )
}

pub async fn screen_by_gap(
    State(state): State<AppState>,
    Json(req): Json<RangeScreenRequest>,
) -> Json<ScreeningResult> {
    // gap 上限缺省 100%
    let max = req.max.or(Some(100.0));
    Json(state.screener.screen_by_gap(req.min, max, req.limit).await)
}

pub async fn screen_by_large_gap(
    State(state): State<AppState>,
    Json(req): Json<LargeGapScreenRequest>,
) -> Json<ScreeningResult> {
    Json(
        state
            .screener
            .screen_by_large_gap(req.percentage, req.limit)
            .await,
    )
}
