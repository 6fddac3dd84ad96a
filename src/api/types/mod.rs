//! API response and request types for the TopstepX REST API.
//!
//! Records mirror the server JSON (camelCase) and are passed through with
//! only presence checks; request types carry the client-side validation.

pub mod account;
pub mod contract;
pub mod order;
pub mod position;
pub mod status;
pub mod trade;

// Re-export all types for convenience
pub use account::*;
pub use contract::*;
pub use order::*;
pub use position::*;
pub use status::*;
pub use trade::*;
