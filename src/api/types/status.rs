//! Response envelope shared by every TopstepX endpoint.

use serde::{Deserialize, Serialize};

use crate::api::error::ErrorResponse;

/// The `success` / `errorCode` / `errorMessage` triple carried by every response.
///
/// Also returned as-is by endpoints that have no payload (cancel, modify, close).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatus {
    /// Whether the server processed the request
    #[serde(default)]
    pub success: bool,
    /// Provider error code (0 = no error)
    #[serde(default)]
    pub error_code: i32,
    /// Human-readable error message
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ApiStatus {
    /// A response only counts as successful when both flags agree.
    pub fn is_success(&self) -> bool {
        self.success && self.error_code == 0
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(
            Some(self.error_code),
            Some(
                self.error_message
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ),
        )
    }
}
