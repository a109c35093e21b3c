use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

// 开发态前端 (Vite dev server) 的默认来源
const DEV_ORIGINS: &[&str] = &["http://localhost:5173", "http://127.0.0.1:5173"];

fn parse_origins(raw: &str) -> Vec<HeaderValue> {
    raw.split(',')
        .filter_map(|o| {
            let trimmed = o.trim();
            if trimmed.is_empty() {
                None
            } else {
                HeaderValue::from_str(trimmed).ok()
            }
        })
        .collect()
}

/// CORS：来源取 ALLOWED_ORIGINS 环境变量，缺省放行本地前端
pub fn cors_layer() -> CorsLayer {
    let allowed_env = std::env::var("ALLOWED_ORIGINS").unwrap_or_default();
    let mut origins = parse_origins(&allowed_env);
    if origins.is_empty() {
        origins = DEV_ORIGINS
            .iter()
            .map(|o| HeaderValue::from_static(o))
            .collect();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
