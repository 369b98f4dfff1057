use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::logging::RegistryEvent;
use crate::models::FieldErrors;

/// Errors that cross the HTTP boundary. Field validation failures are the only
/// domain error; everything else describes a malformed or throttled request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{}", .0.summary_heading().unwrap_or_default())]
    Validation(FieldErrors),

    #[error("invalid JSON payload: {0}")]
    InvalidJson(String),

    #[error("invalid form submission: {0}")]
    InvalidForm(String),

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("too many submissions; please try again later")]
    RateLimitExceeded { retry_after: Option<Duration> },
}

/// Standard JSON error response structure
#[derive(Debug, Serialize)]
struct ErrorResponse<'a> {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a FieldErrors>,
}

impl AppError {
    /// Determines the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidJson(_) | AppError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn log_error(&self) {
        let code = self.status_code();
        match self {
            AppError::Validation(errors) => {
                tracing::debug!(
                    error_count = errors.len(),
                    status_code = %code,
                    "Registration rejected"
                );
            }
            AppError::RateLimitExceeded { .. } => {
                tracing::debug!(status_code = %code, "Submission throttled");
            }
            AppError::InvalidJson(_)
            | AppError::InvalidForm(_)
            | AppError::UnsupportedMediaType(_)
            | AppError::PayloadTooLarge => {
                crate::log_registry_event!(
                    RegistryEvent::MalformedSubmission,
                    error = %self,
                    status_code = %code,
                    "Malformed submission"
                );
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log_error();

        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            fields: match &self {
                AppError::Validation(errors) => Some(errors),
                _ => None,
            },
        });
        let mut response = (status, body).into_response();

        if let AppError::RateLimitExceeded {
            retry_after: Some(retry_after),
        } = &self
            && let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().max(1).to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }

        response
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::models::Field;

    fn two_errors() -> FieldErrors {
        let mut errors = FieldErrors::default();
        errors.reject(Field::FullName, "Enter your full name");
        errors.reject(Field::Country, "Select a country");
        errors
    }

    #[test]
    fn test_validation_error_status() {
        let error = AppError::Validation(two_errors());
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error.to_string(), "Please correct the 2 errors below");
    }

    #[test]
    fn test_malformed_request_statuses() {
        assert_eq!(
            AppError::InvalidJson("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnsupportedMediaType("text/plain".to_string()).status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            AppError::PayloadTooLarge.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let response = AppError::Validation(two_errors()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "Please correct the 2 errors below");
        assert_eq!(json["fields"]["fullName"], "Enter your full name");
        assert_eq!(json["fields"]["country"], "Select a country");
        assert!(json["fields"].get("age").is_none());
    }

    #[test]
    fn test_rate_limit_sets_retry_after() {
        let response = AppError::RateLimitExceeded {
            retry_after: Some(Duration::from_millis(1500)),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(RETRY_AFTER).unwrap(), "1");
    }
}
