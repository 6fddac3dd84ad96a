//! Network URL constants for the TopstepX SDK.

/// Default REST API base URL for TopstepX.
pub const DEFAULT_API_URL: &str = "https://api.topstepx.com";
