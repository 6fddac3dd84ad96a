//! REST API client module for TopstepX.
//!
//! This module provides a type-safe HTTP client for the TopstepX REST API:
//! accounts, contracts, orders, positions and trades.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use topstepx::api::TopstepXClient;
//! use topstepx::auth::TopstepXAuth;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TopstepXClient::new(TopstepXAuth::from_env()?)?;
//!
//!     let accounts = client.get_active_accounts().await?;
//!     let positions = client.get_open_positions(accounts[0].id).await?;
//!     println!("{} open positions", positions.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>`. Server-side failures are split by
//! endpoint family:
//!
//! ```rust,ignore
//! use topstepx::api::ApiError;
//!
//! match client.place_order(request).await {
//!     Ok(response) => println!("Placed {:?}", response.order_id),
//!     Err(ApiError::InvalidOrder(e)) => println!("Rejected locally: {}", e),
//!     Err(ApiError::Order(details)) => println!("Rejected by server: {}", details.get_message()),
//!     Err(ApiError::Authentication(e)) => println!("Login problem: {}", e),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! # Order Placement
//!
//! ```rust,ignore
//! use rust_decimal::Decimal;
//! use topstepx::api::{OrderSide, PlaceOrderRequest};
//!
//! let request = PlaceOrderRequest::limit(account_id, "CON.F.US.EP.M25", OrderSide::Buy, 1, Decimal::new(520025, 2))
//!     .with_custom_tag("entry-1");
//! let response = client.place_order(request).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{TopstepXClient, TopstepXClientBuilder};
pub use error::{ApiError, ApiResult, ErrorCategory, ErrorResponse};
pub use types::*;
