use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::app::AppState;
use crate::handler::watchlist::{
    add_to_watchlist, clear_watchlist, get_watchlist, remove_from_watchlist, replace_watchlist,
    screen_watchlist,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get_watchlist)
                .put(replace_watchlist)
                .post(add_to_watchlist)
                .delete(clear_watchlist),
        )
        .route("/screen", post(screen_watchlist))
        .route("/:symbol", delete(remove_from_watchlist))
}
