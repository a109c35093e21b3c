use axum::{routing::get, Router};

use crate::app::AppState;
use crate::handler::quote::get_quote;

pub fn router() -> Router<AppState> {
    Router::new().route("/quote/:symbol", get(get_quote))
}
