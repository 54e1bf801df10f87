use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No market-data API key is configured.")]
    MissingCredentials,

    #[error("Invalid ticker symbol '{0}'.")]
    InvalidTicker(String),

    #[error("API client error: {0}")]
    ApiClient(#[from] api_client::error::ApiError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),
}
