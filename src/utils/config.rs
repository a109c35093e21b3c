use std::net::SocketAddr;
use std::path::PathBuf;

use crate::services::provider::DEFAULT_BASE_URL;
use crate::services::screener::DEFAULT_CONCURRENCY;

pub struct ServerConfig {
    pub addr: SocketAddr,
    /// 行情接口 base URL，测试时指向本地 mock
    pub quote_base_url: String,
    /// 自选股 JSON 文件路径
    pub watchlist_path: PathBuf,
    /// 行情拉取并发上限
    pub concurrency: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3001);
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .expect("Invalid HOST/PORT");

        let quote_base_url =
            std::env::var("QUOTE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let watchlist_path = std::env::var("WATCHLIST_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./watchlist.json"));

        let concurrency = std::env::var("SCREEN_CONCURRENCY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONCURRENCY);

        Self {
            addr,
            quote_base_url,
            watchlist_path,
            concurrency,
        }
    }
}
