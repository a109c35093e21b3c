use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api_models::{
    AddSymbolRequest, ReplaceWatchlistRequest, WatchlistResponse, WatchlistScreenRequest,
};
use crate::app::AppState;
use crate::handler::error::AppError;
use crate::models::{ScreeningFilters, ScreeningResult};

fn watchlist_response(state: &AppState, symbols: Vec<String>) -> WatchlistResponse {
    let meta = state.watchlist.metadata();
    WatchlistResponse {
        count: symbols.len(),
        symbols,
        last_updated: meta.last_updated,
    }
}

/// 对自选股列表做一轮筛选，symbols 必须非空
pub async fn screen_watchlist(
    State(state): State<AppState>,
    Json(req): Json<WatchlistScreenRequest>,
) -> Result<Json<ScreeningResult>, AppError> {
    let symbols = req.symbols.unwrap_or_default();
    if symbols.is_empty() {
        return Err(AppError::BadRequest("No symbols provided".to_string()));
    }

    tracing::info!("screening watchlist: {}", symbols.join(", "));
    Ok(Json(
        state
            .screener
            .screen_symbols(&symbols, &ScreeningFilters::default())
            .await,
    ))
}

/// 当前自选股列表
pub async fn get_watchlist(State(state): State<AppState>) -> Json<WatchlistResponse> {
    let symbols = state.watchlist.load();
    Json(watchlist_response(&state, symbols))
}

/// 整表替换自选股
pub async fn replace_watchlist(
    State(state): State<AppState>,
    Json(req): Json<ReplaceWatchlistRequest>,
) -> Result<Json<WatchlistResponse>, AppError> {
    let saved = state.watchlist.save(&req.symbols)?;
    Ok(Json(watchlist_response(&state, saved)))
}

/// 添加单只自选股
#[axum::debug_handler]
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(req): Json<AddSymbolRequest>,
) -> Result<(StatusCode, Json<WatchlistResponse>), AppError> {
    let symbols = state.watchlist.add(&req.symbol)?;
    Ok((
        StatusCode::CREATED,
        Json(watchlist_response(&state, symbols)),
    ))
}

/// 移除单只自选股
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<WatchlistResponse>, AppError> {
    let symbols = state.watchlist.remove(&symbol)?;
    Ok(Json(watchlist_response(&state, symbols)))
}

/// 清空自选股
pub async fn clear_watchlist(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.watchlist.clear()?;
    Ok(StatusCode::NO_CONTENT)
}
