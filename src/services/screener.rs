use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::models::stock::{ScreeningFilters, ScreeningResult, Stock};
use crate::services::provider::QuoteProvider;

/// 内置选股池：美股大中盘 + 指数 ETF，约 100 只
pub const DEFAULT_UNIVERSE: &[&str] = &[
    // 科技巨头
    "AAPL", "MSFT", "GOOG", "GOOGL", "AMZN", "NVDA", "META", "TSLA",
    // 大盘科技
    "AMD", "ADBE", "CRM", "AVGO", "QCOM", "CSCO", "INTC", "NFLX", "ASML", "MU",
    // 大盘金融
    "JPM", "BAC", "WFC", "GS", "MS", "BLK", "SCHW",
    // 大盘医疗
    "JNJ", "UNH", "PFE", "ABBV", "MRK", "LLY", "TMO", "AZN",
    // 大盘工业
    "BA", "CAT", "GE", "HON", "MMM", "ITW", "LMT", "RTX",
    // 大盘能源
    "XOM", "CVX", "COP", "SLB", "MPC", "PSX", "EOG",
    // 大盘消费
    "WMT", "TGT", "COST", "MCD", "NKE", "SBUX", "CMG", "DIS",
    // 通信
    "VZ", "T", "CMCSA", "CHTR", "TMUS",
    // 公用事业
    "NEE", "DUK", "SO", "EXC", "AEP",
    // 房地产
    "PLD", "EQIX", "DLR", "PSA", "WELL",
    // 中盘成长
    "SNOW", "DDOG", "NOW", "CRWD", "SPLK", "OKTA", "TWLO", "ZM",
    // 生物医药
    "GILD", "BIIB", "ALNY", "SGEN", "BKNG", "REGN",
    // 半导体
    "MCHP", "NXPI", "LRCX", "KLAC", "AMAT", "ASML",
    // 零售与消费互联网
    "AMZN", "BABA", "SE", "DKNG", "DASH", "UBER",
    // 金融科技与支付
    "SQ", "PYPL", "COIN", "HOOD", "AXP",
    // 中小盘高成长
    "UPST", "RBLX", "ROKU", "PINS", "TTD", "ZS", "PSTG",
    // 指数 ETF
    "SPY", "QQQ", "IWM", "XLK", "XLF", "XLE", "XLV", "XLY",
];

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_CONCURRENCY: usize = 8;

pub fn default_universe() -> Vec<String> {
    DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect()
}

/// 选股服务：并发拉取行情 -> 构建 Stock 记录 -> 本地过滤
///
/// 选股池与数据源都由构造方注入。并发拉取是有上限的扇出
/// (信号量控制)，单只股票失败只丢弃该股，不影响其余。
pub struct StockScreener {
    universe: Vec<String>,
    provider: Arc<dyn QuoteProvider>,
    concurrency: usize,
}

impl StockScreener {
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_universe(provider, default_universe(), DEFAULT_CONCURRENCY)
    }

    pub fn with_universe(
        provider: Arc<dyn QuoteProvider>,
        universe: Vec<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            universe,
            provider,
            concurrency: concurrency.clamp(1, 64),
        }
    }

    /// 单只股票快照，拉取失败或无价格数据返回 None
    pub async fn quote(&self, symbol: &str) -> Option<Stock> {
        match self.provider.quote(symbol).await {
            Ok(Some(raw)) => Stock::from_quote(symbol, raw),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("quote fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }

    /// 对内置选股池做一轮筛选
    pub async fn screen(&self, filters: &ScreeningFilters) -> ScreeningResult {
        self.screen_symbols(&self.universe, filters).await
    }

    /// 对任意标的列表做一轮筛选（自选股场景）
    pub async fn screen_symbols(
        &self,
        symbols: &[String],
        filters: &ScreeningFilters,
    ) -> ScreeningResult {
        tracing::info!("screening {} symbols", symbols.len());
        let stocks = self.fetch_all(symbols).await;
        tracing::info!("{}/{} symbols returned quotes", stocks.len(), symbols.len());

        let filtered = filter_stocks(stocks, filters);
        tracing::info!("{} stocks match criteria", filtered.len());
        ScreeningResult::new(filtered)
    }

    /// 上游预定义筛选器选股，失败降级为空结果而不是报错
    pub async fn screen_predefined(&self, screen_id: &str, limit: usize) -> ScreeningResult {
        let rows = match self.provider.predefined(screen_id, limit).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("predefined screen {} failed: {}", screen_id, e);
                return ScreeningResult::empty();
            }
        };
        let data: Vec<Stock> = rows.into_iter().filter_map(Stock::from_screener_quote).collect();
        ScreeningResult::new(data)
    }

    pub async fn screen_by_market_cap(
        &self,
        min: Option<f64>,
        max: Option<f64>,
        limit: Option<usize>,
    ) -> ScreeningResult {
        let filters = ScreeningFilters {
            min_market_cap: min,
            max_market_cap: max,
            limit,
            ..ScreeningFilters::default()
        };
        self.screen(&filters).await
    }

    pub async fn screen_by_pe(
        &self,
        min: Option<f64>,
        max: Option<f64>,
        limit: Option<usize>,
    ) -> ScreeningResult {
        let filters = ScreeningFilters {
            min_pe: min,
            max_pe: max,
            limit,
            ..ScreeningFilters::default()
        };
        self.screen(&filters).await
    }

    pub async fn screen_by_dividend_yield(
        &self,
        min: Option<f64>,
        limit: Option<usize>,
    ) -> ScreeningResult {
        let filters = ScreeningFilters {
            min_dividend_yield: min,
            limit,
            ..ScreeningFilters::default()
        };
        self.screen(&filters).await
    }

    pub async fn screen_by_gap(
        &self,
        min: Option<f64>,
        max: Option<f64>,
        limit: Option<usize>,
    ) -> ScreeningResult {
        let filters = ScreeningFilters {
            min_gap: min,
            max_gap: max,
            limit,
            ..ScreeningFilters::default()
        };
        self.screen(&filters).await
    }

    pub async fn screen_by_large_gap(
        &self,
        percentage: Option<f64>,
        limit: Option<usize>,
    ) -> ScreeningResult {
        let filters = ScreeningFilters {
            min_gap: percentage,
            limit,
            ..ScreeningFilters::default()
        };
        self.screen(&filters).await
    }

    // scatter/gather：每只股票一个任务，信号量限流，失败槽位归 None
    async fn fetch_all(&self, symbols: &[String]) -> Vec<Stock> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let provider = Arc::clone(&self.provider);
            let symbol = symbol.clone();
            let h = tokio::spawn(async move {
                let _p = permit;
                match provider.quote(&symbol).await {
                    Ok(Some(raw)) => Stock::from_quote(&symbol, raw),
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!("quote fetch failed for {}: {}", symbol, e);
                        None
                    }
                }
            });
            handles.push(h);
        }

        let mut stocks = Vec::new();
        for h in handles {
            if let Ok(Some(stock)) = h.await {
                stocks.push(stock);
            }
        }
        stocks
    }
}

/// 过滤后按到达顺序截断到 limit，不做排序
pub(crate) fn filter_stocks(stocks: Vec<Stock>, filters: &ScreeningFilters) -> Vec<Stock> {
    let limit = filters.limit.unwrap_or(DEFAULT_LIMIT);
    let mut out: Vec<Stock> = stocks.into_iter().filter(|s| passes(s, filters)).collect();
    out.truncate(limit);
    out
}

// 条件存在但记录缺对应字段 => 不通过；gap 条件例外，
// 记录本身没有盘前 gap 时跳过该条件
fn passes(stock: &Stock, filters: &ScreeningFilters) -> bool {
    if let Some(min) = filters.min_market_cap {
        if !stock.market_cap.is_some_and(|v| v >= min) {
            return false;
        }
    }
    if let Some(max) = filters.max_market_cap {
        if !stock.market_cap.is_some_and(|v| v <= max) {
            return false;
        }
    }

    if let Some(min) = filters.min_price {
        if !stock.price.is_some_and(|v| v >= min) {
            return false;
        }
    }
    if let Some(max) = filters.max_price {
        if !stock.price.is_some_and(|v| v <= max) {
            return false;
        }
    }

    if let Some(min) = filters.min_pe {
        if !stock.pe.is_some_and(|v| v >= min) {
            return false;
        }
    }
    if let Some(max) = filters.max_pe {
        if !stock.pe.is_some_and(|v| v <= max) {
            return false;
        }
    }

    if let Some(min) = filters.min_dividend_yield {
        if !stock.dividend_yield.is_some_and(|v| v >= min) {
            return false;
        }
    }

    // gap 按盘前 gap 的绝对值比较，-60% 与 +60% 等价
    if let Some(min) = filters.min_gap {
        if let Some(gap) = stock.pre_market_gap {
            if gap.abs() < min {
                return false;
            }
        }
    }
    if let Some(max) = filters.max_gap {
        if let Some(gap) = stock.pre_market_gap {
            if gap.abs() > max {
                return false;
            }
        }
    }

    if let Some(sector) = &filters.sector {
        if stock.sector.as_deref() != Some(sector.as_str()) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use async_trait::async_trait;

    use crate::models::stock::RawQuote;
    use crate::services::provider::ProviderError;

    /// 内存数据源：固定行情表 + 可指定必失败的标的
    struct FakeProvider {
        quotes: HashMap<String, RawQuote>,
        failing: HashSet<String>,
        screener_rows: Vec<RawQuote>,
        screener_fails: bool,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                quotes: HashMap::new(),
                failing: HashSet::new(),
                screener_rows: Vec::new(),
                screener_fails: false,
            }
        }

        fn with_quote(mut self, symbol: &str, quote: RawQuote) -> Self {
            self.quotes.insert(symbol.to_string(), quote);
            self
        }

        fn with_failure(mut self, symbol: &str) -> Self {
            self.failing.insert(symbol.to_string());
            self
        }
    }

    #[async_trait]
    impl QuoteProvider for FakeProvider {
        async fn quote(&self, symbol: &str) -> Result<Option<RawQuote>, ProviderError> {
            if self.failing.contains(symbol) {
                return Err(ProviderError::Upstream(500));
            }
            Ok(self.quotes.get(symbol).cloned())
        }

        async fn predefined(
            &self,
            _screen_id: &str,
            count: usize,
        ) -> Result<Vec<RawQuote>, ProviderError> {
            if self.screener_fails {
                return Err(ProviderError::Upstream(404));
            }
            Ok(self.screener_rows.iter().take(count).cloned().collect())
        }
    }

    fn priced(price: f64) -> RawQuote {
        RawQuote {
            regular_market_price: Some(price),
            ..RawQuote::default()
        }
    }

    fn stock(symbol: &str) -> Stock {
        Stock::from_quote(symbol, priced(100.0)).unwrap()
    }

    fn screener_over(provider: FakeProvider, symbols: &[&str]) -> StockScreener {
        StockScreener::with_universe(
            Arc::new(provider),
            symbols.iter().map(|s| s.to_string()).collect(),
            4,
        )
    }

    #[tokio::test]
    async fn failed_symbol_does_not_affect_siblings() {
        let provider = FakeProvider::new()
            .with_quote("AAA", priced(10.0))
            .with_failure("BBB")
            .with_quote("CCC", priced(30.0));
        let screener = screener_over(provider, &["AAA", "BBB", "CCC"]);

        let result = screener.screen(&ScreeningFilters::default()).await;
        assert_eq!(result.count, 2);
        let symbols: Vec<&str> = result.data.iter().map(|s| s.symbol.as_str()).collect();
        assert!(symbols.contains(&"AAA"));
        assert!(symbols.contains(&"CCC"));
        assert!(!symbols.contains(&"BBB"));
    }

    #[tokio::test]
    async fn priceless_symbol_is_dropped() {
        let provider = FakeProvider::new()
            .with_quote("AAA", priced(10.0))
            .with_quote("BBB", RawQuote::default());
        let screener = screener_over(provider, &["AAA", "BBB"]);

        let result = screener.screen(&ScreeningFilters::default()).await;
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].symbol, "AAA");
    }

    #[tokio::test]
    async fn count_matches_data_and_respects_default_limit() {
        let mut provider = FakeProvider::new();
        let mut universe = Vec::new();
        for i in 0..60 {
            let symbol = format!("S{}", i);
            provider.quotes.insert(symbol.clone(), priced(1.0 + i as f64));
            universe.push(symbol);
        }
        let screener = StockScreener::with_universe(Arc::new(provider), universe, 8);

        let result = screener.screen(&ScreeningFilters::default()).await;
        assert_eq!(result.count, result.data.len());
        assert_eq!(result.count, DEFAULT_LIMIT);
    }

    #[tokio::test]
    async fn explicit_limit_is_honored() {
        let mut provider = FakeProvider::new();
        let mut universe = Vec::new();
        for i in 0..20 {
            let symbol = format!("S{}", i);
            provider.quotes.insert(symbol.clone(), priced(5.0));
            universe.push(symbol);
        }
        let screener = StockScreener::with_universe(Arc::new(provider), universe, 8);

        let filters = ScreeningFilters {
            limit: Some(5),
            ..ScreeningFilters::default()
        };
        let result = screener.screen(&filters).await;
        assert_eq!(result.count, 5);
    }

    #[tokio::test]
    async fn predefined_failure_yields_empty_result() {
        let mut provider = FakeProvider::new();
        provider.screener_fails = true;
        let screener = StockScreener::new(Arc::new(provider));

        let result = screener.screen_predefined("no_such_screen", 50).await;
        assert_eq!(result.count, 0);
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn predefined_maps_rows_without_local_filtering() {
        let mut provider = FakeProvider::new();
        provider.screener_rows = vec![
            RawQuote {
                symbol: Some("GME".to_string()),
                regular_market_price: Some(25.0),
                regular_market_change_percent: Some(18.4),
                ..RawQuote::default()
            },
            // 无 symbol 的行映射失败被丢弃
            RawQuote::default(),
        ];
        let screener = StockScreener::new(Arc::new(provider));

        let result = screener.screen_predefined("day_gainers", 50).await;
        assert_eq!(result.count, 1);
        assert_eq!(result.data[0].symbol, "GME");
    }

    #[test]
    fn gap_filter_compares_magnitude() {
        let mut s = stock("GAP");
        s.pre_market_gap = Some(-60.0);

        let filters = ScreeningFilters {
            min_gap: Some(50.0),
            max_gap: Some(70.0),
            ..ScreeningFilters::default()
        };
        let out = filter_stocks(vec![s.clone()], &filters);
        assert_eq!(out.len(), 1);

        let filters = ScreeningFilters {
            max_gap: Some(50.0),
            ..ScreeningFilters::default()
        };
        assert!(filter_stocks(vec![s], &filters).is_empty());
    }

    #[test]
    fn gap_filter_skipped_when_record_has_no_pre_market_gap() {
        let mut s = stock("NOPRE");
        s.pre_market_gap = None;

        let filters = ScreeningFilters {
            min_gap: Some(50.0),
            ..ScreeningFilters::default()
        };
        let out = filter_stocks(vec![s], &filters);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn present_bound_excludes_record_missing_the_field() {
        let mut s = stock("NOCAP");
        s.market_cap = None;

        let filters = ScreeningFilters {
            min_market_cap: Some(1e9),
            ..ScreeningFilters::default()
        };
        assert!(filter_stocks(vec![s], &filters).is_empty());
    }

    #[test]
    fn zero_valued_bound_is_still_enforced() {
        let mut no_pe = stock("NOPE");
        no_pe.pe = None;
        let mut with_pe = stock("PE");
        with_pe.pe = Some(12.0);

        // Some(0.0) 与未提供不同：仍然要求字段存在
        let filters = ScreeningFilters {
            min_pe: Some(0.0),
            ..ScreeningFilters::default()
        };
        let out = filter_stocks(vec![no_pe, with_pe], &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "PE");
    }

    #[test]
    fn sector_filter_is_exact_match() {
        let mut tech = stock("TECH");
        tech.sector = Some("Technology".to_string());
        let mut energy = stock("ENE");
        energy.sector = Some("Energy".to_string());
        let unknown = stock("UNK");

        let filters = ScreeningFilters {
            sector: Some("Technology".to_string()),
            ..ScreeningFilters::default()
        };
        let out = filter_stocks(vec![tech, energy, unknown], &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "TECH");
    }

    #[test]
    fn min_above_max_yields_empty() {
        let mut s = stock("X");
        s.market_cap = Some(5e9);

        let filters = ScreeningFilters {
            min_market_cap: Some(1e10),
            max_market_cap: Some(1e9),
            ..ScreeningFilters::default()
        };
        assert!(filter_stocks(vec![s], &filters).is_empty());
    }

    #[test]
    fn predicates_combine_conjunctively() {
        let mut good = stock("GOOD");
        good.market_cap = Some(2e9);
        good.pe = Some(20.0);
        good.sector = Some("Technology".to_string());
        let mut bad_pe = good.clone();
        bad_pe.symbol = "BADPE".to_string();
        bad_pe.pe = Some(90.0);

        let filters = ScreeningFilters {
            min_market_cap: Some(1e9),
            min_pe: Some(0.0),
            max_pe: Some(40.0),
            sector: Some("Technology".to_string()),
            ..ScreeningFilters::default()
        };
        let out = filter_stocks(vec![good, bad_pe], &filters);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].symbol, "GOOD");
    }
}
