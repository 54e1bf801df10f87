use crate::enums::Sentiment;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single daily close for one symbol, as delivered by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// One row of the inner join of a target and a benchmark price history.
///
/// `price_a` is the target ticker, `price_b` the benchmark. Prices are `f64`
/// from this point on; the aligner is the Decimal -> f64 boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
}

/// Day-over-day fractional returns of both legs for one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnRow {
    pub date: NaiveDate,
    pub return_a: f64,
    pub return_b: f64,
}

/// Rolling regression output for the window ending on `date`.
/// Either field may be `NaN` when the benchmark had zero variance in the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlphaBetaPoint {
    pub date: NaiveDate,
    pub alpha: f64,
    pub beta: f64,
}

/// A generic dated observation (relative performance, z-score, alpha, ...).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: f64,
}

impl DatedValue {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A news item in the shape the dashboard frontend renders.
///
/// Both the general-articles and the stock-news endpoints are adapted to this
/// shape so the frontend never has to care which one served the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub date: String,
    pub content: String,
    pub image: String,
    pub link: String,
    pub author: String,
    pub site: String,
    /// Tagged on articles fetched from the provider; mocks carry none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}
