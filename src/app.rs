use std::sync::Arc;

use axum::Router;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

use crate::routes;
use crate::services::provider::YahooQuoteClient;
use crate::services::screener::{default_universe, StockScreener};
use crate::services::watchlist::WatchlistStore;
use crate::utils::config::ServerConfig;
use crate::utils::{http_client, middleware};

#[derive(Clone)]
pub struct AppState {
    pub screener: Arc<StockScreener>,
    pub watchlist: Arc<WatchlistStore>,
}

pub fn build_app(cfg: &ServerConfig) -> Router {
    let http = http_client::create_quote_client().expect("Failed to build quote http client");
    let provider = Arc::new(YahooQuoteClient::new(http, cfg.quote_base_url.clone()));
    let screener = Arc::new(StockScreener::with_universe(
        provider,
        default_universe(),
        cfg.concurrency,
    ));
    let watchlist = Arc::new(WatchlistStore::new(&cfg.watchlist_path));

    build_app_with_state(AppState {
        screener,
        watchlist,
    })
}

pub fn build_app_with_state(state: AppState) -> Router {
    routes::build_routes()
        .with_state(state)
        .layer(middleware::cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
