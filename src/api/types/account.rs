//! Account-related types for the TopstepX REST API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account ID
    pub id: i64,
    /// Account name
    #[serde(default)]
    pub name: String,
    /// Current balance
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub balance: Option<Decimal>,
    /// Whether orders may be placed on this account
    #[serde(default)]
    pub can_trade: Option<bool>,
    /// Whether the account is shown in the platform UI
    #[serde(default)]
    pub is_visible: Option<bool>,
    /// Simulated (practice/combine) account
    #[serde(default)]
    pub simulated: Option<bool>,
}

impl Account {
    /// Treats a missing `canTrade` flag as not tradable.
    pub fn is_tradable(&self) -> bool {
        self.can_trade.unwrap_or(false)
    }
}

/// Request for POST /api/Account/search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAccountsRequest {
    pub only_active_accounts: bool,
}

/// Response for POST /api/Account/search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Body for endpoints scoped to a single account (`searchOpen` variants).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub account_id: i64,
}
