use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::availability::ResolveStep;

/// Message shown for any upstream failure; the client is expected to retry.
pub const RETRY_MESSAGE: &str = "Failed to fetch content details. Please try again.";

/// Message shown when no provider offers the title.
pub const NO_AVAILABILITY_MESSAGE: &str = "No streaming information found";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("No streaming information found: {0}")]
    NoAvailabilityData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Request cancelled during {0}")]
    Cancelled(ResolveStep),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures of either upstream provider (transport or non-2xx)
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::HttpClient(_) | AppError::ExternalApi(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::HttpClient(_) | AppError::ExternalApi(_) => {
                tracing::error!(error = %self, "Upstream provider request failed");
                (StatusCode::BAD_GATEWAY, RETRY_MESSAGE.to_string())
            }
            AppError::NoAvailabilityData(_) => {
                (StatusCode::NOT_FOUND, NO_AVAILABILITY_MESSAGE.to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Cancelled(_) => {
                tracing::debug!(error = %self, "Request abandoned before completion");
                (
                    StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT),
                    self.to_string(),
                )
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_hide_status() {
        let err = AppError::ExternalApi("TMDB returned status 503: down".to_string());
        assert!(err.is_upstream());

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_no_availability_maps_to_not_found() {
        let response =
            AppError::NoAvailabilityData("zero matches".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cancelled_display_names_step() {
        let err = AppError::Cancelled(ResolveStep::FetchSources);
        assert!(!err.is_upstream());
        assert_eq!(err.to_string(), "Request cancelled during fetch_sources");
        assert_eq!(err.into_response().status().as_u16(), 499);
    }

    #[test]
    fn test_invalid_input_is_bad_request() {
        let response = AppError::InvalidInput("empty query".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
