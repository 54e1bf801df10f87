use crate::error::EngineError;
use crate::news::{mock_articles, with_sentiment};
use crate::util::normalize_ticker;
use analytics::{AnalyticsEngine, FallbackGenerator, MetricSnapshot, PerformanceCharts};
use api_client::error::ApiError;
use api_client::{FmpClient, MarketDataClient};
use chrono::{Duration, NaiveDate};
use configuration::Config;
use core_types::Article;
use std::sync::Arc;
use tracing::{error, info, warn};

pub mod error;
pub mod news;
pub mod util;

/// The central orchestrator behind every dashboard endpoint.
///
/// Owns the configuration, the market-data client (absent without an API key)
/// and the pure analytics engine. Immutable after construction, so one
/// instance is shared by all requests.
pub struct DashboardEngine {
    config: Config,
    client: Option<Arc<dyn MarketDataClient>>,
    analytics: AnalyticsEngine,
}

impl DashboardEngine {
    /// Creates an engine talking to Financial Modeling Prep, or one that only
    /// serves fallback data when no API key is configured.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let client: Option<Arc<dyn MarketDataClient>> = if config.market_data.has_credentials() {
            Some(Arc::new(FmpClient::new(&config.market_data)?))
        } else {
            warn!("No FMP API key configured; dashboard endpoints will serve mock data.");
            None
        };
        Ok(Self::build(config, client))
    }

    /// Creates an engine around an existing client (live or mock).
    pub fn with_client(config: Config, client: Arc<dyn MarketDataClient>) -> Self {
        Self::build(config, Some(client))
    }

    fn build(config: Config, client: Option<Arc<dyn MarketDataClient>>) -> Self {
        let analytics = AnalyticsEngine::new(config.analytics.clone());
        Self {
            config,
            client,
            analytics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The four performance charts for `ticker` against the benchmark.
    ///
    /// Unless `fallback.strict` is set this never fails: any error is logged and
    /// answered with the synthetic payload for today.
    pub async fn performance_charts(
        &self,
        ticker: Option<&str>,
    ) -> Result<PerformanceCharts, EngineError> {
        self.performance_charts_as_of(ticker, util::today()).await
    }

    /// As [`performance_charts`](Self::performance_charts), with "today" supplied.
    pub async fn performance_charts_as_of(
        &self,
        ticker: Option<&str>,
        today: NaiveDate,
    ) -> Result<PerformanceCharts, EngineError> {
        let result = self.compute_charts(ticker).await;
        self.recover(result, "performance_charts", || FallbackGenerator::generate(today))
    }

    async fn compute_charts(&self, ticker: Option<&str>) -> Result<PerformanceCharts, EngineError> {
        let client = self.client()?;
        let market = &self.config.market_data;
        let symbol = normalize_ticker(ticker, &market.default_ticker)?;
        let benchmark = market.benchmark_symbol.as_str();

        let (target, benchmark_prices) = tokio::try_join!(
            client.fetch_historical_prices(&symbol, market.lookback_days),
            client.fetch_historical_prices(benchmark, market.lookback_days),
        )?;
        info!(
            %symbol,
            benchmark,
            target_points = target.len(),
            benchmark_points = benchmark_prices.len(),
            "Fetched price histories."
        );

        Ok(self.analytics.calculate(&target, &benchmark_prices)?)
    }

    /// Up to a page of stock news for `ticker`, or general market articles
    /// without one. Falls back to mock articles unless strict.
    pub async fn articles(&self, ticker: Option<&str>) -> Result<Vec<Article>, EngineError> {
        let ticker = ticker.map(str::trim).filter(|t| !t.is_empty());
        let symbol = match ticker.map(|t| normalize_ticker(Some(t), t)).transpose() {
            Ok(symbol) => symbol,
            Err(e) => return self.recover(Err(e), "articles", || mock_articles(ticker)),
        };

        let result = self.fetch_articles(symbol.as_deref()).await;
        self.recover(result, "articles", || mock_articles(symbol.as_deref()))
    }

    async fn fetch_articles(&self, symbol: Option<&str>) -> Result<Vec<Article>, EngineError> {
        let client = self.client()?;
        let market = &self.config.market_data;
        let size = market.page_size as usize;

        match symbol {
            None => {
                let articles = client.fetch_articles(0, market.page_size).await?;
                if articles.is_empty() {
                    return Err(ApiError::NotFound("general market articles".to_string()).into());
                }
                Ok(articles.into_iter().take(size).map(with_sentiment).collect())
            }
            Some(symbol) => {
                let to = util::today();
                let from = to - Duration::days(market.news_lookback_days);
                let articles = client
                    .search_stock_news(&[symbol.to_string()], from, to, 0, market.page_size)
                    .await?;
                // A quiet news month is a valid answer, not a failure.
                Ok(articles.into_iter().take(size).map(with_sentiment).collect())
            }
        }
    }

    /// Point-in-time alpha, beta, z-score, relative performance and price.
    ///
    /// Figures that cannot be computed are `None`; unless strict, fetch
    /// failures produce a snapshot with every figure missing.
    pub async fn snapshot(&self, ticker: Option<&str>) -> Result<MetricSnapshot, EngineError> {
        let market = &self.config.market_data;
        let benchmark = market.benchmark_symbol.as_str();
        let symbol = match normalize_ticker(ticker, &market.default_ticker) {
            Ok(symbol) => symbol,
            Err(e) => {
                let shown = ticker.unwrap_or_default().to_string();
                return self.recover(Err(e), "snapshot", || {
                    MetricSnapshot::unavailable(&shown, benchmark)
                });
            }
        };

        let result = self.compute_snapshot(&symbol).await;
        self.recover(result, "snapshot", || MetricSnapshot::unavailable(&symbol, benchmark))
    }

    async fn compute_snapshot(&self, symbol: &str) -> Result<MetricSnapshot, EngineError> {
        let client = self.client()?;
        let market = &self.config.market_data;
        let benchmark = market.benchmark_symbol.as_str();

        let (histories, latest_price) = tokio::join!(
            async {
                tokio::try_join!(
                    client.fetch_historical_prices(symbol, market.lookback_days),
                    client.fetch_historical_prices(benchmark, market.lookback_days),
                )
            },
            client.fetch_latest_price(symbol),
        );
        let (target, benchmark_prices) = histories?;

        let latest_price = match latest_price {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(symbol, error = %e, "Latest price unavailable.");
                None
            }
        };

        Ok(self
            .analytics
            .snapshot(symbol, benchmark, &target, &benchmark_prices)
            .with_latest_price(latest_price))
    }

    /// The credential gate, checked before any fetch.
    fn client(&self) -> Result<&Arc<dyn MarketDataClient>, EngineError> {
        if !self.config.market_data.has_credentials() {
            return Err(EngineError::MissingCredentials);
        }
        self.client.as_ref().ok_or(EngineError::MissingCredentials)
    }

    /// Applies the fallback policy to the outcome of an operation.
    fn recover<T>(
        &self,
        result: Result<T, EngineError>,
        operation: &str,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, EngineError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if self.config.fallback.strict => Err(e),
            Err(EngineError::MissingCredentials) => {
                warn!(operation, "No FMP API key; returning mock data.");
                Ok(fallback())
            }
            Err(e) => {
                error!(operation, error = %e, "Falling back to mock data.");
                Ok(fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::error::ApiError;
    use async_trait::async_trait;
    use core_types::{PricePoint, Sentiment};
    use rust_decimal::Decimal;
    use rust_decimal::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the mock does when asked for data.
    #[derive(Clone, Copy)]
    enum Failure {
        None,
        Network,
        RateLimited,
    }

    struct MockClient {
        histories: HashMap<String, Vec<PricePoint>>,
        articles: Vec<Article>,
        news: Vec<Article>,
        failure: Failure,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                histories: HashMap::new(),
                articles: Vec::new(),
                news: Vec::new(),
                failure: Failure::None,
                calls: AtomicUsize::new(0),
            }
        }

        fn with_history(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
            self.histories.insert(symbol.to_string(), points);
            self
        }

        fn failing(mut self, failure: Failure) -> Self {
            self.failure = failure;
            self
        }

        fn check(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failure {
                Failure::None => Ok(()),
                Failure::Network => Err(ApiError::Network("connection reset by peer".to_string())),
                Failure::RateLimited => Err(ApiError::RateLimited("/v3/stock_news".to_string())),
            }
        }
    }

    #[async_trait]
    impl MarketDataClient for MockClient {
        async fn fetch_historical_prices(
            &self,
            symbol: &str,
            _lookback_days: u32,
        ) -> Result<Vec<PricePoint>, ApiError> {
            self.check()?;
            self.histories
                .get(symbol)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(symbol.to_string()))
        }

        async fn fetch_articles(&self, _page: u32, size: u32) -> Result<Vec<Article>, ApiError> {
            self.check()?;
            Ok(self.articles.iter().take(size as usize).cloned().collect())
        }

        async fn search_stock_news(
            &self,
            _tickers: &[String],
            _from: NaiveDate,
            _to: NaiveDate,
            _page: u32,
            _limit: u32,
        ) -> Result<Vec<Article>, ApiError> {
            self.check()?;
            Ok(self.news.clone())
        }

        async fn fetch_latest_price(&self, symbol: &str) -> Result<Decimal, ApiError> {
            self.check()?;
            self.histories
                .get(symbol)
                .and_then(|h| h.first())
                .map(|p| p.close)
                .ok_or_else(|| ApiError::NotFound(symbol.to_string()))
        }
    }

    fn config(api_key: Option<&str>, strict: bool) -> Config {
        let mut config = Config::default();
        config.market_data.api_key = api_key.map(str::to_string);
        config.fallback.strict = strict;
        config
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    /// `days` consecutive closes ending today, newest first like the provider.
    fn history(days: i64, base: f64, phase: f64) -> Vec<PricePoint> {
        (0..days)
            .map(|back| {
                let x = (days - back) as f64;
                let close = base * (1.0 + 0.0003 * x) + base * 0.02 * (x * 0.17 + phase).sin();
                PricePoint::new(
                    today() - Duration::days(back),
                    Decimal::from_f64(close).unwrap().round_dp(2),
                )
            })
            .collect()
    }

    fn market() -> MockClient {
        MockClient::new()
            .with_history("IBM", history(500, 170.0, 0.0))
            .with_history("SPY", history(500, 510.0, 2.0))
    }

    #[tokio::test]
    async fn test_charts_from_market_data() {
        let client = market();
        let ibm_last = client.histories["IBM"][0].close.to_f64().unwrap();
        let spy_last = client.histories["SPY"][0].close.to_f64().unwrap();

        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));
        let charts = engine
            .performance_charts_as_of(Some("ibm"), today())
            .await
            .unwrap();

        assert_eq!(
            charts.relative_performance.value,
            format!("{:+.2}%", (ibm_last / spy_last - 1.0) * 100.0)
        );
        assert_ne!(charts, FallbackGenerator::generate(today()));
    }

    #[tokio::test]
    async fn test_missing_credentials_serve_fallback_without_fetching() {
        let client = Arc::new(market());
        let engine = DashboardEngine::with_client(config(None, false), client.clone());

        let charts = engine.performance_charts_as_of(None, today()).await.unwrap();

        assert_eq!(charts, FallbackGenerator::generate(today()));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_failure_serves_fallback() {
        let client = market().failing(Failure::Network);
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));

        let charts = engine.performance_charts_as_of(Some("IBM"), today()).await.unwrap();
        assert_eq!(charts, FallbackGenerator::generate(today()));
    }

    #[tokio::test]
    async fn test_unknown_ticker_serves_fallback() {
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(market()));

        let charts = engine.performance_charts_as_of(Some("ZZZZ"), today()).await.unwrap();
        assert_eq!(charts, FallbackGenerator::generate(today()));
    }

    #[tokio::test]
    async fn test_too_few_points_in_window_serves_fallback() {
        let client = MockClient::new()
            .with_history("IBM", history(9, 170.0, 0.0))
            .with_history("SPY", history(9, 510.0, 2.0));
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));

        let charts = engine.performance_charts_as_of(None, today()).await.unwrap();
        assert_eq!(charts, FallbackGenerator::generate(today()));
    }

    #[tokio::test]
    async fn test_strict_mode_surfaces_errors() {
        let engine = DashboardEngine::with_client(config(None, true), Arc::new(market()));
        assert!(matches!(
            engine.performance_charts_as_of(None, today()).await,
            Err(EngineError::MissingCredentials)
        ));

        let client = market().failing(Failure::Network);
        let engine = DashboardEngine::with_client(config(Some("key"), true), Arc::new(client));
        assert!(matches!(
            engine.performance_charts_as_of(None, today()).await,
            Err(EngineError::ApiClient(ApiError::Network(_)))
        ));

        let engine = DashboardEngine::with_client(config(Some("key"), true), Arc::new(market()));
        assert!(matches!(
            engine.performance_charts_as_of(Some("../x"), today()).await,
            Err(EngineError::InvalidTicker(_))
        ));
    }

    #[tokio::test]
    async fn test_new_without_key_has_no_client() {
        let engine = DashboardEngine::new(config(None, false)).unwrap();
        let charts = engine.performance_charts_as_of(None, today()).await.unwrap();
        assert_eq!(charts, FallbackGenerator::generate(today()));
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            date: "2025-03-13 10:00:00".to_string(),
            content: "<p>body</p>".to_string(),
            image: String::new(),
            link: "https://example.com".to_string(),
            author: String::new(),
            site: "example.com".to_string(),
            sentiment: None,
        }
    }

    #[tokio::test]
    async fn test_general_articles() {
        let mut client = market();
        client.articles = (1..=8).map(|i| article(&format!("Article {}", i))).collect();
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));

        let articles = engine.articles(None).await.unwrap();
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].title, "Article 1");
        assert_eq!(articles[0].sentiment, Some(Sentiment::Neutral));
    }

    #[tokio::test]
    async fn test_empty_general_articles_fall_back_to_mock() {
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(market()));
        let articles = engine.articles(Some("  ")).await.unwrap();
        assert_eq!(articles, mock_articles(None));
    }

    #[tokio::test]
    async fn test_stock_news_fewer_than_a_page_returned_as_is() {
        let mut client = market();
        client.news = vec![article("IBM profit beats estimates"), article("IBM launches")];
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));

        let articles = engine.articles(Some("ibm")).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].sentiment, Some(Sentiment::Positive));
        assert_eq!(articles[1].sentiment, Some(Sentiment::Neutral));
    }

    #[tokio::test]
    async fn test_news_failure_falls_back_to_mock() {
        let client = market().failing(Failure::RateLimited);
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(client));
        let articles = engine.articles(Some("aapl")).await.unwrap();
        assert_eq!(articles, mock_articles(Some("AAPL")));

        let engine = DashboardEngine::with_client(config(None, false), Arc::new(market()));
        assert_eq!(engine.articles(None).await.unwrap(), mock_articles(None));

        let client = market().failing(Failure::RateLimited);
        let engine = DashboardEngine::with_client(config(Some("key"), true), Arc::new(client));
        assert!(matches!(
            engine.articles(Some("AAPL")).await,
            Err(EngineError::ApiClient(ApiError::RateLimited(_)))
        ));
    }

    #[tokio::test]
    async fn test_invalid_ticker_news_falls_back_to_ticker_mocks() {
        let client = Arc::new(market());
        let engine = DashboardEngine::with_client(config(Some("key"), false), client.clone());

        let articles = engine.articles(Some("brk b")).await.unwrap();
        assert_eq!(articles, mock_articles(Some("BRK B")));
        assert_eq!(articles[0].title, "Mock News #1 for BRK B");
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);

        let engine = DashboardEngine::with_client(config(Some("key"), true), Arc::new(market()));
        assert!(matches!(
            engine.articles(Some("brk b")).await,
            Err(EngineError::InvalidTicker(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot() {
        let engine = DashboardEngine::with_client(config(Some("key"), false), Arc::new(market()));
        let snapshot = engine.snapshot(Some("IBM")).await.unwrap();

        assert_eq!(snapshot.symbol, "IBM");
        assert_eq!(snapshot.benchmark, "SPY");
        assert!(snapshot.beta.is_some());
        assert!(snapshot.alpha.is_some());
        assert!(snapshot.relative_performance_pct.is_some());
        assert_eq!(snapshot.latest_price, Some(market().histories["IBM"][0].close));
    }

    #[tokio::test]
    async fn test_snapshot_without_credentials_is_empty() {
        let engine = DashboardEngine::with_client(config(None, false), Arc::new(market()));
        let snapshot = engine.snapshot(None).await.unwrap();
        assert_eq!(snapshot, MetricSnapshot::unavailable("IBM", "SPY"));
    }
}
