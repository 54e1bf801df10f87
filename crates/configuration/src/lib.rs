use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsConfig, Config, CumulativeAlphaScope, FallbackConfig, LoggingConfig,
    MarketDataConfig, ServerConfig,
};

/// Environment variable holding the Financial Modeling Prep API key.
pub const API_KEY_ENV: &str = "FMP_API_KEY";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// This function is the primary entry point for this crate. A missing file is not an
/// error: every section has defaults, and the environment can supply the rest.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads configuration from `path`, then `STOCKBOARD_<SECTION>__<KEY>` variables,
/// then the `FMP_API_KEY` variable, and validates the result.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("STOCKBOARD")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    let config = with_api_key(config, std::env::var(API_KEY_ENV).ok());

    config.validate()?;
    Ok(config)
}

/// Overrides `market_data.api_key` when a non-blank key is supplied.
pub fn with_api_key(mut config: Config, api_key: Option<String>) -> Config {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.market_data.api_key = Some(key);
    }
    config
}
