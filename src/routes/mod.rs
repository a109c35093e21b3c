use axum::Router;

use crate::app::AppState;

mod profiles;
mod quote;
mod root;
mod screen;
mod watchlist;

pub fn build_routes() -> Router<AppState> {
    Router::new()
        // 根路径与健康检查
        .merge(root::router())
        // 业务 API 统一挂在 /api 前缀下
        .nest(
            "/api",
            root::api_router()
                .merge(quote::router())
                .merge(profiles::router())
                .nest("/screen", screen::router())
                .nest("/watchlist", watchlist::router()),
        )
}
