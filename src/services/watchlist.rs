use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::symbol::normalize_symbol;

pub const MAX_SYMBOLS: usize = 50;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("invalid ticker symbol: {0}")]
    InvalidSymbol(String),
    #[error("symbol already in watchlist: {0}")]
    Duplicate(String),
    #[error("symbol not in watchlist: {0}")]
    NotFound(String),
    #[error("watchlist is full (max {MAX_SYMBOLS} symbols)")]
    Full,
    #[error("watchlist storage error: {0}")]
    Storage(#[from] io::Error),
    #[error("watchlist encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 落盘格式：单个 JSON 对象 {symbols, lastUpdated}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatchlistData {
    symbols: Vec<String>,
    /// 毫秒时间戳
    last_updated: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistMetadata {
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// 自选股存储：单文件 JSON，去重、校验、上限 50 只
///
/// 同步读写，后写覆盖先写，不做跨进程协调。
#[derive(Debug, Clone)]
pub struct WatchlistStore {
    path: PathBuf,
}

impl WatchlistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> WatchlistData {
        // 文件缺失或损坏一律当作空表
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => WatchlistData::default(),
        }
    }

    fn write(&self, symbols: Vec<String>) -> Result<Vec<String>, WatchlistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = WatchlistData {
            symbols,
            last_updated: Utc::now().timestamp_millis(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&data)?)?;
        Ok(data.symbols)
    }

    pub fn load(&self) -> Vec<String> {
        self.read().symbols
    }

    /// 整表替换：清洗后写盘，返回实际保存的列表
    ///
    /// 不合法的代码静默丢弃，重复项保留首个。
    pub fn save(&self, symbols: &[String]) -> Result<Vec<String>, WatchlistError> {
        let mut seen = HashSet::new();
        let cleaned: Vec<String> = symbols
            .iter()
            .filter_map(|s| normalize_symbol(s))
            .filter(|s| seen.insert(s.clone()))
            .collect();

        if cleaned.len() > MAX_SYMBOLS {
            return Err(WatchlistError::Full);
        }
        self.write(cleaned)
    }

    pub fn add(&self, symbol: &str) -> Result<Vec<String>, WatchlistError> {
        let cleaned = normalize_symbol(symbol)
            .ok_or_else(|| WatchlistError::InvalidSymbol(symbol.to_string()))?;

        let mut symbols = self.load();
        if symbols.contains(&cleaned) {
            return Err(WatchlistError::Duplicate(cleaned));
        }
        if symbols.len() >= MAX_SYMBOLS {
            return Err(WatchlistError::Full);
        }
        symbols.push(cleaned);
        self.write(symbols)
    }

    pub fn remove(&self, symbol: &str) -> Result<Vec<String>, WatchlistError> {
        let cleaned = symbol.trim().to_uppercase();
        let mut symbols = self.load();
        let before = symbols.len();
        symbols.retain(|s| s != &cleaned);
        if symbols.len() == before {
            return Err(WatchlistError::NotFound(cleaned));
        }
        self.write(symbols)
    }

    pub fn clear(&self) -> Result<(), WatchlistError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn metadata(&self) -> WatchlistMetadata {
        let data = self.read();
        let last_updated = (data.last_updated > 0)
            .then(|| DateTime::from_timestamp_millis(data.last_updated))
            .flatten();
        WatchlistMetadata {
            count: data.symbols.len(),
            last_updated,
        }
    }
}
