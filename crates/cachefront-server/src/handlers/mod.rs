//! HTTP handlers
//!
//! Handler errors carry a status code and a JSON body with a message and a
//! stable error code. Cache failures surface as errors instead of being
//! swallowed into default values, so clients can tell a miss from an outage.

pub mod memory;
pub mod ops;
pub mod redis;

use cachefront_domain::error::Error;
use rocket::http::Status;
use rocket::serde::json::Json;
use std::time::Duration;

/// Error type returned by all handlers
pub type ApiError = (Status, Json<ErrorResponse>);

/// JSON error body
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(format!("{} not found", resource), "NOT_FOUND")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, "BAD_REQUEST")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, "INTERNAL_ERROR")
    }

    pub fn redis_unavailable() -> Self {
        Self::new(
            "no redis backend configured: set cache.redis_url to enable these endpoints",
            "REDIS_UNAVAILABLE",
        )
    }
}

/// Validate an optional TTL from a request body
///
/// A zero TTL is ambiguous across backends (immediate expiry vs. no
/// expiry), so it is rejected up front.
pub fn parse_ttl(secs: Option<u64>) -> Result<Option<Duration>, ApiError> {
    match secs {
        Some(0) => Err(map_error(Error::invalid_argument(
            "ttl_secs must be greater than zero",
        ))),
        other => Ok(other.map(Duration::from_secs)),
    }
}

/// Map a domain error onto an HTTP status and JSON body
pub fn map_error(error: Error) -> ApiError {
    match error {
        Error::NotFound { resource } => (
            Status::NotFound,
            Json(ErrorResponse::not_found(&resource)),
        ),
        Error::InvalidArgument { message } => {
            (Status::BadRequest, Json(ErrorResponse::bad_request(message)))
        }
        Error::Serialization { source } => (
            Status::BadRequest,
            Json(ErrorResponse::bad_request(source.to_string())),
        ),
        other => (
            Status::InternalServerError,
            Json(ErrorResponse::internal(other.to_string())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, body) = map_error(Error::not_found("entry 'k'"));
        assert_eq!(status, Status::NotFound);
        assert_eq!(body.code, "NOT_FOUND");
    }

    #[test]
    fn test_invalid_argument_maps_to_400() {
        let (status, _) = map_error(Error::invalid_argument("bad ttl"));
        assert_eq!(status, Status::BadRequest);
    }

    #[test]
    fn test_parse_ttl_rejects_zero() {
        assert!(parse_ttl(Some(0)).is_err());
        assert_eq!(parse_ttl(Some(5)).unwrap(), Some(Duration::from_secs(5)));
        assert_eq!(parse_ttl(None).unwrap(), None);
    }

    #[test]
    fn test_serialization_error_maps_to_400() {
        let bad_json = serde_json::from_str::<u32>("not json").unwrap_err();
        let (status, body) = map_error(Error::from(bad_json));
        assert_eq!(status, Status::BadRequest);
        assert_eq!(body.code, "BAD_REQUEST");
    }

    #[test]
    fn test_cache_error_maps_to_500() {
        let (status, body) = map_error(Error::cache("connection reset"));
        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body.code, "INTERNAL_ERROR");
    }
}
