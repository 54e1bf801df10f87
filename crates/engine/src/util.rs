use crate::error::EngineError;
use chrono::{Local, NaiveDate};

/// The calendar date the dashboard considers "today".
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Upper-cases and validates a ticker, substituting `default` when it is blank.
///
/// Tickers end up in URL paths, so only the characters exchanges actually use
/// are accepted (e.g. `BRK.B`, `^GSPC`, `EURUSD=X`).
pub fn normalize_ticker(ticker: Option<&str>, default: &str) -> Result<String, EngineError> {
    let raw = ticker.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(default);
    let symbol = raw.to_uppercase();

    let valid = !symbol.is_empty()
        && symbol.len() <= 15
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if !valid {
        return Err(EngineError::InvalidTicker(raw.to_string()));
    }
    Ok(symbol)
}
