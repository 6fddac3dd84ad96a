//! Contract-related types for the TopstepX REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tradable futures contract (e.g. `CON.F.US.EP.M25`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Contract ID
    pub id: String,
    /// Short name (e.g. `ESM5`)
    #[serde(default)]
    pub name: String,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// Minimum price increment
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub tick_size: Option<Decimal>,
    /// Dollar value of one tick
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub tick_value: Option<Decimal>,
    /// Whether this is the front/active contract for its symbol
    #[serde(default)]
    pub active_contract: Option<bool>,
    /// Symbol ID (e.g. `F.US.EP`)
    #[serde(default)]
    pub symbol_id: Option<String>,
}

/// Request for POST /api/Contract/available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableContractsRequest {
    /// Live contracts when true, otherwise the simulated feed
    pub live: bool,
}

/// Request for POST /api/Contract/search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContractsRequest {
    pub search_text: String,
    pub live: bool,
}

/// Response for contract listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsResponse {
    #[serde(default)]
    pub contracts: Vec<Contract>,
}
