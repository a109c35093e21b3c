use serde::Deserialize;

/// /screen/predefined 请求体；scrId 为上游原生字段名，兼容老客户端
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedScreenRequest {
    #[serde(alias = "scrId")]
    pub screen_id: Option<String>,
    pub limit: Option<usize>,
}

/// 区间类便捷入口（market-cap / pe / dividend / gap）共用的请求体
#[derive(Debug, Deserialize)]
pub struct RangeScreenRequest {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LargeGapScreenRequest {
    pub percentage: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct WatchlistScreenRequest {
    pub symbols: Option<Vec<String>>,
}
