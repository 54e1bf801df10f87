use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("No data found: {0}")]
    NotFound(String),

    #[error("Rate limited by the provider: {0}")]
    RateLimited(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The API returned an error: {0}")]
    ProviderMessage(String),
}

impl ApiError {
    /// Whether retrying the same request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Timeout(_) | ApiError::Network(_))
    }

    /// Classifies an `{"Error Message": ...}` body, which FMP may send with a
    /// 200 status.
    pub fn from_provider_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("limit reach") {
            ApiError::RateLimited(message.to_string())
        } else if lower.contains("invalid api key") {
            ApiError::Unauthorized(message.to_string())
        } else {
            ApiError::ProviderMessage(message.to_string())
        }
    }
}
