use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::{Article, PricePoint};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

// FMP field names are camelCase; fields the dashboard never reads are left out.

/// Parses a provider body, turning an `{"Error Message": ...}` object into an
/// error before attempting the expected shape.
pub fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    if let Some(message) = value.get("Error Message").and_then(|m| m.as_str()) {
        return Err(ApiError::from_provider_message(message));
    }

    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// One daily bar from `GET /v3/historical-price-full/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalBar {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// The shapes `historical-price-full` is seen to return: the documented
/// wrapper, a bare list, or `{}` for an unknown symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HistoricalResponse {
    Full {
        #[serde(default)]
        symbol: Option<String>,
        historical: Vec<HistoricalBar>,
    },
    Bare(Vec<HistoricalBar>),
    Empty {},
}

impl HistoricalResponse {
    /// Normalises into price points, newest first as the provider sends them.
    pub fn into_points(self, symbol: &str) -> Result<Vec<PricePoint>, ApiError> {
        let bars = match self {
            HistoricalResponse::Full { historical, .. } => historical,
            HistoricalResponse::Bare(bars) => bars,
            HistoricalResponse::Empty {} => Vec::new(),
        };
        if bars.is_empty() {
            return Err(ApiError::NotFound(format!("historical prices for {}", symbol)));
        }
        Ok(bars
            .into_iter()
            .map(|bar| PricePoint::new(bar.date, bar.close))
            .collect())
    }
}

/// One item of `GET /v3/stock_news`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StockNewsItem {
    pub symbol: String,
    pub published_date: String,
    pub title: String,
    pub image: String,
    pub site: String,
    pub text: String,
    pub url: String,
}

impl StockNewsItem {
    /// Adapts to the general-article shape. The endpoint has no author.
    pub fn into_article(self) -> Article {
        Article {
            title: self.title.trim().to_string(),
            date: self.published_date.trim().to_string(),
            content: self.text.trim().to_string(),
            image: self.image.trim().to_string(),
            link: self.url.trim().to_string(),
            author: String::new(),
            site: self.site.trim().to_string(),
            sentiment: None,
        }
    }
}

/// One item of the `content` array of `GET /v3/fmp/articles`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FmpArticle {
    pub title: String,
    pub date: String,
    pub content: String,
    pub tickers: String,
    pub image: String,
    pub link: String,
    pub author: String,
    pub site: String,
}

impl From<FmpArticle> for Article {
    fn from(a: FmpArticle) -> Self {
        Article {
            title: a.title,
            date: a.date,
            content: a.content,
            image: a.image,
            link: a.link,
            author: a.author,
            site: a.site,
            sentiment: None,
        }
    }
}

/// `GET /v3/fmp/articles` wraps its items in `{"content": [...]}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticlesPage {
    pub content: Vec<FmpArticle>,
}

/// One element of `GET /v3/quote-short/{symbol}`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteShort {
    pub symbol: String,
    pub price: Decimal,
}
