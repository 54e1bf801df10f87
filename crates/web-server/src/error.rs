use analytics::AnalyticsError;
use api_client::error::ApiError;
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::error::EngineError;
use serde_json::json;
use thiserror::Error;

/// Errors a handler can return. Only reachable in strict mode; otherwise the
/// engine answers every failure with fallback data.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Invalid query string: {0}")]
    Query(#[from] QueryRejection),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Engine(EngineError::MissingCredentials) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Engine(EngineError::InvalidTicker(_)) => StatusCode::BAD_REQUEST,
            AppError::Engine(EngineError::ApiClient(api_err)) => match api_err {
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Engine(EngineError::Analytics(AnalyticsError::InsufficientData(_))) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Query(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, "Request failed.");
            "An internal server error occurred".to_string()
        } else {
            tracing::warn!(error = %self, "Request rejected.");
            self.to_string()
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
