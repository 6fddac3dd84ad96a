//! API error types for the TopstepX REST API client.

use thiserror::Error;

use crate::api::types::OrderValidationError;
use crate::auth::AuthError;

/// API-specific error type for the TopstepX REST API client.
///
/// Failures reported by the server are split by the endpoint family that
/// produced them, so callers can match on `Order`, `Position` or `Api`
/// separately. Nothing is retried internally.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Login/refresh failed, or any endpoint answered 401.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthError),

    /// Order placement, search, cancel or modify failed on the server.
    #[error("Order error: {}", .0.get_message())]
    Order(ErrorResponse),

    /// Position query or close failed on the server.
    #[error("Position error: {}", .0.get_message())]
    Position(ErrorResponse),

    /// Account, contract or trade request failed on the server.
    #[error("API error: {}", .0.get_message())]
    Api(ErrorResponse),

    /// Order rejected client-side before anything was sent.
    #[error("Invalid order: {0}")]
    InvalidOrder(#[from] OrderValidationError),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// HTTP/network error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

impl ApiError {
    /// Build the server-side error variant for an endpoint family.
    pub fn from_category(category: ErrorCategory, response: ErrorResponse) -> Self {
        match category {
            ErrorCategory::Api => ApiError::Api(response),
            ErrorCategory::Order => ApiError::Order(response),
            ErrorCategory::Position => ApiError::Position(response),
        }
    }

    /// True for both server-side order failures and client-side order validation.
    pub fn is_order_error(&self) -> bool {
        matches!(self, ApiError::Order(_) | ApiError::InvalidOrder(_))
    }

    pub fn is_position_error(&self) -> bool {
        matches!(self, ApiError::Position(_))
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Authentication(_))
    }

    /// Provider error code, when the server supplied one.
    pub fn error_code(&self) -> Option<i32> {
        match self {
            ApiError::Order(r) | ApiError::Position(r) | ApiError::Api(r) => r.error_code,
            ApiError::Authentication(AuthError::Rejected { error_code, .. }) => *error_code,
            _ => None,
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Endpoint family, used to pick the error variant for a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Accounts, contracts, trades
    Api,
    /// Order place/search/cancel/modify
    Order,
    /// Position search/close/partial close
    Position,
}

/// Error details reported by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Provider error code (`errorCode`)
    #[serde(default)]
    pub error_code: Option<i32>,
    /// Human-readable error message (`errorMessage`)
    #[serde(default, rename = "errorMessage", alias = "message", alias = "title")]
    pub message: Option<String>,
    /// HTTP status, when the failure came from a non-success status
    #[serde(skip)]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn new(error_code: Option<i32>, message: Option<String>) -> Self {
        Self {
            error_code,
            message,
            status: None,
        }
    }

    /// Wrap a raw (non-JSON) response body.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            error_code: None,
            message: (!text.is_empty()).then_some(text),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Get the error message, falling back to the status code or a generic text.
    pub fn get_message(&self) -> String {
        match (&self.message, self.error_code, self.status) {
            (Some(message), Some(code), _) if code != 0 => format!("{} (error code {})", message, code),
            (Some(message), _, _) => message.clone(),
            (None, Some(code), _) if code != 0 => format!("Unknown error (error code {})", code),
            (None, _, Some(status)) => format!("HTTP {}", status),
            _ => "Unknown error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_deserialize() {
        let json = r#"{"success": false, "errorCode": 2, "errorMessage": "Order rejected"}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.error_code, Some(2));
        assert_eq!(response.message.as_deref(), Some("Order rejected"));
        assert_eq!(response.get_message(), "Order rejected (error code 2)");
    }

    #[test]
    fn test_error_response_from_problem_details() {
        let json = r#"{"title": "Unauthorized", "status": 401}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message.as_deref(), Some("Unauthorized"));
        assert_eq!(response.status, None);
    }

    #[test]
    fn test_get_message_fallbacks() {
        assert_eq!(ErrorResponse::default().get_message(), "Unknown error");
        assert_eq!(
            ErrorResponse::default().with_status(503).get_message(),
            "HTTP 503"
        );
        assert_eq!(ErrorResponse::from_text("").message, None);
        assert_eq!(ErrorResponse::from_text("boom").get_message(), "boom");
    }

    #[test]
    fn test_category_selects_variant() {
        let response = ErrorResponse::new(Some(5), Some("nope".to_string()));
        assert!(ApiError::from_category(ErrorCategory::Order, response.clone()).is_order_error());
        assert!(ApiError::from_category(ErrorCategory::Position, response.clone()).is_position_error());
        let api = ApiError::from_category(ErrorCategory::Api, response);
        assert!(matches!(api, ApiError::Api(_)));
        assert_eq!(api.error_code(), Some(5));
    }

    #[test]
    fn test_auth_error_converts() {
        let err: ApiError = AuthError::Unauthorized("expired".to_string()).into();
        assert!(err.is_auth_error());
        assert!(err.to_string().contains("expired"));
    }
}
