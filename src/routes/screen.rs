use axum::{routing::post, Router};

use crate::app::AppState;
use crate::handler::screen::{
    screen, screen_by_dividend, screen_by_gap, screen_by_large_gap, screen_by_market_cap,
    screen_by_pe, screen_predefined,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(screen))
        .route("/predefined", post(screen_predefined))
        .route("/market-cap", post(screen_by_market_cap))
        .route("/pe", post(screen_by_pe))
        .route("/dividend", post(screen_by_dividend))
        .route("/gap", post(screen_by_gap))
        .route("/gap/large", post(screen_by_large_gap))
}
