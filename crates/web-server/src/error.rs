use api_client::error::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API key not configured")]
    MissingApiKey,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Upstream(#[from] ApiError),
}

impl AppError {
    /// The status code and client-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::MissingApiKey | AppError::Upstream(ApiError::MissingApiKey) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key not configured".to_string(),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Upstream(err @ ApiError::InvalidSymbol(_)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Upstream(err @ ApiError::RateLimited) => {
                (StatusCode::TOO_MANY_REQUESTS, err.to_string())
            }
            AppError::Upstream(err @ ApiError::Timeout(_)) => {
                (StatusCode::GATEWAY_TIMEOUT, err.to_string())
            }
            AppError::Upstream(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error fetching company data: {}", err),
            ),
        }
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed.");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected.");
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_map_to_their_status_codes() {
        let cases = [
            (AppError::MissingApiKey, StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::InvalidSymbol("A B".into()).into(), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited.into(), StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Timeout("ratios".into()).into(), StatusCode::GATEWAY_TIMEOUT),
            (ApiError::Provider("bad key".into()).into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.status_and_message().0, expected, "{error:?}");
        }
    }

    #[test]
    fn messages_match_what_clients_expect() {
        let (_, message) = AppError::from(ApiError::Timeout("metrics".into())).status_and_message();
        assert_eq!(message, "Timeout while fetching metrics data");

        let (_, message) = AppError::from(ApiError::RateLimited).status_and_message();
        assert_eq!(message, "API rate limit exceeded. Please try again later.");

        let (_, message) = AppError::MissingApiKey.status_and_message();
        assert_eq!(message, "API key not configured");
    }
}
