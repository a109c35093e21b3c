use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 上游行情接口返回的原始快照，字段均可能缺失
#[derive(Debug, Clone, Default)]
pub struct RawQuote {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub regular_market_change_percent: Option<f64>,
    pub pre_market_price: Option<f64>,
    pub pre_market_change_percent: Option<f64>,
    pub market_cap: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub trailing_pe: Option<f64>,
    /// 股息率，上游为小数表示 (0.0123 = 1.23%)
    pub dividend_yield: Option<f64>,
    pub beta: Option<f64>,
    pub volume: Option<u64>,
    pub avg_volume: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub symbol: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_market_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_market_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<u64>,
}

/// 涨跌幅百分比，previous 为 0 时返回 0 避免除零
pub fn percent_gap(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

impl Stock {
    /// 把单只股票的原始快照转成 Stock 记录
    ///
    /// 无现价视为无数据，返回 None。previous close / 盘前价缺失时
    /// 回退到现价，盘前 gap 随之退化为 0。
    pub fn from_quote(fallback_symbol: &str, quote: RawQuote) -> Option<Stock> {
        let price = quote.regular_market_price?;
        let previous_close = quote.regular_market_previous_close.unwrap_or(price);
        let gap = percent_gap(price, previous_close);
        let pre_market_price = quote.pre_market_price.unwrap_or(price);
        let pre_market_gap = percent_gap(pre_market_price, previous_close);

        Some(Stock {
            symbol: quote
                .symbol
                .unwrap_or_else(|| fallback_symbol.to_string()),
            company_name: quote
                .long_name
                .unwrap_or_else(|| fallback_symbol.to_string()),
            price: Some(price),
            previous_close: Some(previous_close),
            gap: Some(gap),
            pre_market_price: Some(pre_market_price),
            pre_market_gap: Some(pre_market_gap),
            market_cap: quote.market_cap,
            sector: quote.sector,
            industry: quote.industry,
            pe: quote.trailing_pe,
            dividend_yield: Some(quote.dividend_yield.map(|y| y * 100.0).unwrap_or(0.0)),
            beta: quote.beta,
            volume: quote.volume,
            avg_volume: quote.avg_volume,
        })
    }

    /// 把预定义筛选器返回的行转成 Stock 记录
    ///
    /// 选股由上游筛选器完成，这里只做字段映射：gap 直接取上游的
    /// 涨跌幅字段，不在本地重新计算。
    pub fn from_screener_quote(quote: RawQuote) -> Option<Stock> {
        let symbol = quote.symbol?;
        let company_name = quote
            .long_name
            .or(quote.short_name)
            .unwrap_or_else(|| symbol.clone());

        Some(Stock {
            company_name,
            price: quote.regular_market_price,
            previous_close: quote.regular_market_previous_close,
            gap: quote.regular_market_change_percent,
            pre_market_price: quote.pre_market_price.or(quote.regular_market_price),
            pre_market_gap: quote
                .pre_market_change_percent
                .or(quote.regular_market_change_percent),
            market_cap: quote.market_cap,
            sector: quote.sector,
            industry: quote.industry,
            pe: quote.trailing_pe,
            dividend_yield: Some(quote.dividend_yield.map(|y| y * 100.0).unwrap_or(0.0)),
            beta: quote.beta,
            volume: quote.volume,
            avg_volume: quote.avg_volume,
            symbol,
        })
    }
}

/// 筛选条件，全部可选
///
/// 字段为 Some 即生效，包括 Some(0.0)——是否过滤由字段存在与否
/// 决定，不看数值真假。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreeningFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(rename = "minPE", skip_serializing_if = "Option::is_none")]
    pub min_pe: Option<f64>,
    #[serde(rename = "maxPE", skip_serializing_if = "Option::is_none")]
    pub max_pe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_dividend_yield: Option<f64>,
    /// 盘前 gap 绝对值下限，正负 gap 同等对待
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningResult {
    pub data: Vec<Stock>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

impl ScreeningResult {
    pub fn new(data: Vec<Stock>) -> Self {
        Self {
            count: data.len(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
