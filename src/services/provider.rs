use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::models::stock::RawQuote;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const QUOTE_PATH: &str = "/v7/finance/quote";
const SCREENER_PATH: &str = "/v1/finance/screener/predefined/saved";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream error: status {0}")]
    Upstream(u16),
}

/// 行情数据源的抽象，便于注入测试替身
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 单只股票的实时快照，上游无此标的时返回 None
    async fn quote(&self, symbol: &str) -> Result<Option<RawQuote>, ProviderError>;

    /// 上游预定义筛选器的选股结果，按上游排名排序
    async fn predefined(
        &self,
        screen_id: &str,
        count: usize,
    ) -> Result<Vec<RawQuote>, ProviderError>;
}

pub struct YahooQuoteClient {
    http: Client,
    base_url: String,
}

impl YahooQuoteClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }
}

fn parse_raw_quote(v: &Value) -> RawQuote {
    RawQuote {
        symbol: v.get("symbol").and_then(Value::as_str).map(str::to_string),
        long_name: v.get("longName").and_then(Value::as_str).map(str::to_string),
        short_name: v.get("shortName").and_then(Value::as_str).map(str::to_string),
        regular_market_price: v.get("regularMarketPrice").and_then(Value::as_f64),
        regular_market_previous_close: v
            .get("regularMarketPreviousClose")
            .and_then(Value::as_f64),
        regular_market_change_percent: v
            .get("regularMarketChangePercent")
            .and_then(Value::as_f64),
        pre_market_price: v.get("preMarketPrice").and_then(Value::as_f64),
        pre_market_change_percent: v.get("preMarketChangePercent").and_then(Value::as_f64),
        market_cap: v.get("marketCap").and_then(Value::as_f64),
        sector: v.get("sector").and_then(Value::as_str).map(str::to_string),
        industry: v.get("industry").and_then(Value::as_str).map(str::to_string),
        trailing_pe: v.get("trailingPE").and_then(Value::as_f64),
        // 实时快照与筛选器行的股息率字段名不同，取先出现者
        dividend_yield: v
            .get("dividendYield")
            .or_else(|| v.get("trailingAnnualDividendYield"))
            .and_then(Value::as_f64),
        beta: v.get("beta").and_then(Value::as_f64),
        volume: v.get("regularMarketVolume").and_then(Value::as_u64),
        avg_volume: v.get("averageDailyVolume3Month").and_then(Value::as_u64),
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteClient {
    async fn quote(&self, symbol: &str) -> Result<Option<RawQuote>, ProviderError> {
        let url = format!("{}{}", self.base_url, QUOTE_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("symbols", symbol)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Upstream(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        let quote = body
            .get("quoteResponse")
            .and_then(|q| q.get("result"))
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .map(parse_raw_quote);
        Ok(quote)
    }

    async fn predefined(
        &self,
        screen_id: &str,
        count: usize,
    ) -> Result<Vec<RawQuote>, ProviderError> {
        let url = format!("{}{}", self.base_url, SCREENER_PATH);
        let resp = self
            .http
            .get(&url)
            .query(&[("scrIds", screen_id), ("count", &count.to_string())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Upstream(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        let quotes = body
            .get("finance")
            .and_then(|f| f.get("result"))
            .and_then(Value::as_array)
            .and_then(|arr| arr.first())
            .and_then(|r| r.get("quotes"))
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(parse_raw_quote).collect())
            .unwrap_or_default();
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> YahooQuoteClient {
        YahooQuoteClient::new(Client::new(), server.uri())
    }

    #[tokio::test]
    async fn quote_parses_provider_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .and(query_param("symbols", "AAPL"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "quoteResponse": {
                    "result": [{
                        "symbol": "AAPL",
                        "longName": "Apple Inc.",
                        "regularMarketPrice": 190.5,
                        "regularMarketPreviousClose": 185.0,
                        "preMarketPrice": 192.25,
                        "marketCap": 2.9e12,
                        "trailingPE": 31.2,
                        "dividendYield": 0.0052,
                        "beta": 1.28,
                        "regularMarketVolume": 54321000u64,
                        "averageDailyVolume3Month": 60000000u64
                    }],
                    "error": null
                }
            })))
            .mount(&server)
            .await;

        let raw = client_for(&server).quote("AAPL").await.unwrap().unwrap();
        assert_eq!(raw.symbol.as_deref(), Some("AAPL"));
        assert_eq!(raw.regular_market_price, Some(190.5));
        assert_eq!(raw.regular_market_previous_close, Some(185.0));
        assert_eq!(raw.pre_market_price, Some(192.25));
        assert_eq!(raw.dividend_yield, Some(0.0052));
        assert_eq!(raw.volume, Some(54_321_000));
    }

    #[tokio::test]
    async fn quote_returns_none_for_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "quoteResponse": { "result": [], "error": null }
            })))
            .mount(&server)
            .await;

        let raw = client_for(&server).quote("ZZZZZ").await.unwrap();
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn quote_maps_upstream_status_to_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(QUOTE_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).quote("AAPL").await.unwrap_err();
        assert!(matches!(err, ProviderError::Upstream(500)));
    }

    #[tokio::test]
    async fn predefined_parses_quote_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SCREENER_PATH))
            .and(query_param("scrIds", "day_gainers"))
            .and(query_param("count", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "finance": {
                    "result": [{
                        "quotes": [
                            {
                                "symbol": "GME",
                                "shortName": "GameStop",
                                "regularMarketPrice": 25.0,
                                "regularMarketChangePercent": 18.4,
                                "trailingAnnualDividendYield": 0.0
                            },
                            { "symbol": "AMC", "regularMarketPrice": 4.2 }
                        ]
                    }],
                    "error": null
                }
            })))
            .mount(&server)
            .await;

        let rows = client_for(&server)
            .predefined("day_gainers", 25)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol.as_deref(), Some("GME"));
        assert_eq!(rows[0].regular_market_change_percent, Some(18.4));
        assert_eq!(rows[0].dividend_yield, Some(0.0));
        assert_eq!(rows[1].symbol.as_deref(), Some("AMC"));
    }

    #[tokio::test]
    async fn predefined_treats_missing_quotes_as_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SCREENER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "finance": { "result": [], "error": null }
            })))
            .mount(&server)
            .await;

        let rows = client_for(&server).predefined("nope", 50).await.unwrap();
        assert!(rows.is_empty());
    }
}
