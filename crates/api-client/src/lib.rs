use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::MarketDataConfig;
use core_types::{Article, PricePoint};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub mod error;
pub mod responses;
// --- Public API ---
pub use responses::{ArticlesPage, FmpArticle, HistoricalResponse, QuoteShort, StockNewsItem};

/// The abstract interface for a market-data provider.
/// This trait is the contract the dashboard engine uses, allowing the
/// underlying implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches up to `lookback_days` daily closes for `symbol`, newest first.
    async fn fetch_historical_prices(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<PricePoint>, ApiError>;

    /// Fetches one page of general market articles.
    async fn fetch_articles(&self, page: u32, size: u32) -> Result<Vec<Article>, ApiError>;

    /// Fetches news for `tickers` published between `from` and `to`, adapted
    /// to the general-article shape.
    async fn search_stock_news(
        &self,
        tickers: &[String],
        from: NaiveDate,
        to: NaiveDate,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Article>, ApiError>;

    /// Fetches the most recent traded price for `symbol`.
    async fn fetch_latest_price(&self, symbol: &str) -> Result<Decimal, ApiError>;
}

/// A concrete implementation of `MarketDataClient` for Financial Modeling Prep.
#[derive(Clone)]
pub struct FmpClient {
    client: reqwest::Client,
    base_url: String,

    api_key: String,
}

// Never print the key.
impl std::fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FmpClient {
    pub fn new(config: &MarketDataConfig) -> Result<Self, ApiError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::Unauthorized("no API key configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// GETs `path` with `params` plus the key, classifying failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?params, "FMP request");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(path.to_string())
                } else {
                    ApiError::Network(format!("{}: {}", path, e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, path, &body));
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(path.to_string())
            } else {
                ApiError::Network(format!("{}: {}", path, e.without_url()))
            }
        })?;
        responses::parse_body(&text)
    }
}

/// Maps a non-success HTTP status to an error.
fn classify_status(status: StatusCode, path: &str, body: &str) -> ApiError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::Unauthorized(format!("HTTP {} for {}", status.as_u16(), path))
        }
        StatusCode::NOT_FOUND => ApiError::NotFound(path.to_string()),
        _ => {
            // FMP usually explains itself in an "Error Message" body.
            match responses::parse_body::<serde_json::Value>(body) {
                Err(err @ (ApiError::RateLimited(_) | ApiError::Unauthorized(_) | ApiError::ProviderMessage(_))) => err,
                _ => ApiError::ProviderMessage(format!("HTTP {} - {}", status, body)),
            }
        }
    }
}

#[async_trait]
impl MarketDataClient for FmpClient {
    async fn fetch_historical_prices(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<Vec<PricePoint>, ApiError> {
        let path = format!("/v3/historical-price-full/{}", symbol);
        let response: HistoricalResponse = self
            .get_json(&path, &[("timeseries", lookback_days.to_string())])
            .await?;
        response.into_points(symbol)
    }

    async fn fetch_articles(&self, page: u32, size: u32) -> Result<Vec<Article>, ApiError> {
        let response: ArticlesPage = self
            .get_json(
                "/v3/fmp/articles",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.content.into_iter().map(Article::from).collect())
    }

    async fn search_stock_news(
        &self,
        tickers: &[String],
        from: NaiveDate,
        to: NaiveDate,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Article>, ApiError> {
        let tickers = tickers
            .iter()
            .map(|t| t.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");
        let items: Vec<StockNewsItem> = self
            .get_json(
                "/v3/stock_news",
                &[
                    ("tickers", tickers),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(items.into_iter().map(StockNewsItem::into_article).collect())
    }

    async fn fetch_latest_price(&self, symbol: &str) -> Result<Decimal, ApiError> {
        let path = format!("/v3/quote-short/{}", symbol);
        let quotes: Vec<QuoteShort> = self.get_json(&path, &[]).await?;
        quotes
            .into_iter()
            .next()
            .map(|q| q.price)
            .ok_or_else(|| ApiError::NotFound(format!("quote for {}", symbol)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, base_url: &str) -> MarketDataConfig {
        MarketDataConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            timeout_secs: 2,
            ..MarketDataConfig::default()
        }
    }

    #[test]
    fn test_new_requires_a_key() {
        assert!(matches!(
            FmpClient::new(&config(None, "https://financialmodelingprep.com/api")),
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            FmpClient::new(&config(Some("  "), "https://financialmodelingprep.com/api")),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let client = FmpClient::new(&config(Some("secret-key"), "https://financialmodelingprep.com/api/")).unwrap();
        let printed = format!("{:?}", client);
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("https://financialmodelingprep.com/api"));
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "/v3/stock_news", ""),
            ApiError::RateLimited(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "/v3/stock_news", ""),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "/v3/quote-short/ZZZZ", ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            classify_status(
                StatusCode::BAD_REQUEST,
                "/v3/stock_news",
                r#"{"Error Message": "Invalid API KEY. Please retry"}"#
            ),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "/v3/stock_news", "oops"),
            ApiError::ProviderMessage(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transient() {
        // Nothing listens on the discard port locally.
        let client = FmpClient::new(&config(Some("k"), "http://127.0.0.1:9")).unwrap();
        let err = client.fetch_historical_prices("IBM", 500).await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {:?}", err);
    }
}
