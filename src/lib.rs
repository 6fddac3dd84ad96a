//! # TopstepX Rust SDK
//!
//! A Rust SDK for the TopstepX futures trading REST API.
//!
//! ## Modules
//!
//! - [`auth`]: API-key login and session token management
//! - [`api`]: REST API client for accounts, contracts, orders, positions and trades
//! - [`network`]: Network URL constants
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topstepx::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Arc::new(TopstepXAuth::new("username", "api_key")?);
//!     let client = TopstepXClient::new(auth)?;
//!
//!     let accounts = client.get_active_accounts().await?;
//!     let account_id = accounts[0].id;
//!
//!     let order = PlaceOrderRequest::market(account_id, "CON.F.US.EP.M25", OrderSide::Buy, 1);
//!     let placed = client.place_order(order).await?;
//!     println!("Order id: {:?}", placed.order_id);
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Network URL constants.
pub mod network;

/// Authentication module: API-key login and cached session tokens.
pub mod auth;

/// REST API client module for accounts, contracts, orders, positions and trades.
pub mod api;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use topstepx::prelude::*;
/// ```
pub mod prelude {
    // API module exports
    pub use crate::api::{
        TopstepXClient, TopstepXClientBuilder, ApiError, ApiResult, ErrorCategory, ErrorResponse,
        // Records
        Account, Contract, Order, Position, Trade, ApiStatus,
        // Enums
        OrderSide, OrderStatus, OrderType, PositionType,
        // Requests
        PlaceOrderRequest, PlaceOrderResponse, ModifyOrderRequest, OrderValidationError,
    };

    // Network constants
    pub use crate::network::DEFAULT_API_URL;

    // Auth module exports
    pub use crate::auth::{AuthError, AuthResult, Credentials, SessionToken, TopstepXAuth, TopstepXAuthBuilder};
}
