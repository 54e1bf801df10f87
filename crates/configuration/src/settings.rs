use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;

/// Upper bound for calendar look-backs (`display_days`, `news_lookback_days`).
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub market_data: MarketDataConfig,
    pub analytics: AnalyticsConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let a = &self.analytics;
        if a.regression_window < 2 || a.zscore_window < 2 || a.snapshot_zscore_window < 2 {
            return Err(ConfigError::ValidationError(
                "rolling windows must be at least 2".to_string(),
            ));
        }
        if a.snapshot_window < 2 {
            return Err(ConfigError::ValidationError(
                "snapshot_window must be at least 2".to_string(),
            ));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&a.display_days) {
            return Err(ConfigError::ValidationError(format!(
                "display_days must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.market_data.news_lookback_days) {
            return Err(ConfigError::ValidationError(format!(
                "market_data.news_lookback_days must be between 1 and {}",
                MAX_LOOKBACK_DAYS
            )));
        }
        if a.min_display_points < 2 {
            return Err(ConfigError::ValidationError(
                "min_display_points must be at least 2".to_string(),
            ));
        }
        if self.market_data.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "market_data.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.market_data.benchmark_symbol.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "market_data.benchmark_symbol cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Settings for the Financial Modeling Prep client.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// `None` means no credentials: every request is served from the fallback path.
    pub api_key: Option<String>,
    pub base_url: String,
    /// Upper bound for any single upstream request.
    pub timeout_secs: u64,
    /// Number of daily bars requested per symbol.
    pub lookback_days: u32,
    pub benchmark_symbol: String,
    pub default_ticker: String,
    pub news_lookback_days: i64,
    pub page_size: u32,
}

impl MarketDataConfig {
    /// True when a non-blank API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://financialmodelingprep.com/api".to_string(),
            timeout_secs: 10,
            lookback_days: 500,
            benchmark_symbol: "SPY".to_string(),
            default_ticker: "IBM".to_string(),
            news_lookback_days: 30,
            page_size: 5,
        }
    }
}

// Hand-written so the key never ends up in a log line.
impl fmt::Debug for MarketDataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("lookback_days", &self.lookback_days)
            .field("benchmark_symbol", &self.benchmark_symbol)
            .field("default_ticker", &self.default_ticker)
            .field("news_lookback_days", &self.news_lookback_days)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Which alpha history the cumulative alpha running sum covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CumulativeAlphaScope {
    /// Sum only the alphas inside the displayed window (starts at zero on the first shown day).
    #[default]
    DisplayWindow,
    /// Sum the whole fetched history, then trim to the displayed window.
    FullHistory,
}

/// Parameters for the rolling statistics pipeline and the metric snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Rolling alpha/beta window in the chart path.
    pub regression_window: usize,
    /// Rolling z-score window in the chart path.
    pub zscore_window: usize,
    /// Calendar days kept for display, counted back from the latest aligned date.
    pub display_days: i64,
    /// Minimum trimmed chart length; inclusive.
    pub min_display_points: usize,
    pub cumulative_alpha_scope: CumulativeAlphaScope,
    /// Number of most recent returns used by the metric snapshot.
    pub snapshot_window: usize,
    pub snapshot_zscore_window: usize,
    /// Annual risk-free rate, e.g. 0.02 for 2%.
    pub risk_free_rate: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            regression_window: 30,
            zscore_window: 40,
            display_days: 365,
            min_display_points: 10,
            cumulative_alpha_scope: CumulativeAlphaScope::DisplayWindow,
            snapshot_window: 252,
            snapshot_zscore_window: 20,
            risk_free_rate: 0.0,
        }
    }
}

/// Controls the "always render something" policy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// When true, failures are returned to the caller instead of being replaced
    /// by synthetic data.
    pub strict: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    pub directory: String,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,reqwest=warn,hyper=warn".to_string(),
            directory: "logs".to_string(),
            file_name: "app.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analytics.regression_window, 30);
        assert_eq!(config.analytics.zscore_window, 40);
        assert_eq!(config.market_data.benchmark_symbol, "SPY");
        assert!(!config.market_data.has_credentials());
    }

    #[test]
    fn test_window_below_two_is_rejected() {
        let mut config = Config::default();
        config.analytics.zscore_window = 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_lookbacks_are_bounded() {
        let mut config = Config::default();
        config.analytics.display_days = MAX_LOOKBACK_DAYS;
        assert!(config.validate().is_ok());
        config.analytics.display_days = i64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));

        let mut config = Config::default();
        config.market_data.news_lookback_days = 1_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
        config.market_data.news_lookback_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_key_is_not_a_credential() {
        let mut config = Config::default();
        config.market_data.api_key = Some("   ".to_string());
        assert!(!config.market_data.has_credentials());
        config.market_data.api_key = Some("demo".to_string());
        assert!(config.market_data.has_credentials());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = MarketDataConfig::default();
        config.api_key = Some("super-secret".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
