use crate::{AppState, error::AppError};
use analytics::{MetricSnapshot, PerformanceCharts};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use core_types::Article;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct TickerQuery {
    pub ticker: Option<String>,
}

/// The requested ticker, if any.
///
/// A query string that does not parse (e.g. a repeated `ticker`) is only an
/// error in strict mode; otherwise the request is served as if no ticker
/// was given.
fn requested_ticker(
    state: &AppState,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> Result<Option<String>, AppError> {
    match query {
        Ok(Query(query)) => Ok(query.ticker),
        Err(rejection) if state.engine.config().fallback.strict => Err(rejection.into()),
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Ignoring malformed query string.");
            Ok(None)
        }
    }
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /api/performance_charts?ticker=IBM
/// Relative performance, moving z-score, alpha and cumulative alpha against
/// the benchmark. The ticker defaults to the configured one.
pub async fn performance_charts(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> Result<Json<PerformanceCharts>, AppError> {
    let ticker = requested_ticker(&state, query)?;
    let charts = state.engine.performance_charts(ticker.as_deref()).await?;
    Ok(Json(charts))
}

/// # GET /api/fmp_articles?ticker=AAPL
/// Stock news for the ticker, or general market articles without one.
pub async fn fmp_articles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, AppError> {
    let ticker = requested_ticker(&state, query)?;
    let articles = state.engine.articles(ticker.as_deref()).await?;
    Ok(Json(articles))
}

/// # GET /api/metrics?ticker=IBM
pub async fn metrics(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TickerQuery>, QueryRejection>,
) -> Result<Json<MetricSnapshot>, AppError> {
    let ticker = requested_ticker(&state, query)?;
    let snapshot = state.engine.snapshot(ticker.as_deref()).await?;
    Ok(Json(snapshot))
}
