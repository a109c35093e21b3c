use axum::{routing::get, Router};

use crate::app::AppState;
use crate::handler::profiles::get_profiles;

pub fn router() -> Router<AppState> {
    Router::new().route("/profiles", get(get_profiles))
}
