use std::time::Duration;

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Request-terminal failures surfaced to clients.
///
/// All four classes are final: nothing in the pipeline retries, and no
/// partial responses are ever produced.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Upstream credentials missing; reported before rate limiting so
    /// clients can tell "service broken" from "client throttled".
    #[error("Server not configured")]
    Configuration,
    /// Fixed-window budget exhausted for this client.
    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: Duration },
    /// A query parameter failed parsing or bounds checks.
    #[error("Invalid {0}")]
    InvalidParameter(&'static str),
    /// Transport failure, non-2xx status, or malformed upstream body.
    #[error("Upstream request failed")]
    Upstream(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Build the client-visible error response, tagged with the correlation
    /// id so it can be matched to the request log line.
    pub fn into_response_with(self, request_id: &str) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Upstream(details) => json!({
                "error": self.to_string(),
                "details": details,
                "request_id": request_id,
            }),
            _ => json!({
                "error": self.to_string(),
                "request_id": request_id,
            }),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimitExceeded { retry_after } = &self {
            let secs = retry_after.as_secs().max(1);
            response
                .headers_mut()
                .insert("Retry-After", HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(ApiError::Configuration.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::RateLimitExceeded { retry_after: Duration::from_secs(30) }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(ApiError::InvalidParameter("page").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Upstream("boom".to_string()).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn messages_name_the_offending_parameter() {
        assert_eq!(ApiError::InvalidParameter("salary_min").to_string(), "Invalid salary_min");
    }

    #[test]
    fn rate_limit_response_carries_retry_after() {
        let response = ApiError::RateLimitExceeded { retry_after: Duration::from_secs(42) }
            .into_response_with("req-1");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "42");
    }
}
