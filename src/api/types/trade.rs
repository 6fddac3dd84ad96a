//! Trade-related types for the TopstepX REST API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::OrderSide;

/// Executed trade (fill).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: i64,
    pub account_id: i64,
    pub contract_id: String,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Realized P&L; `null` for half-turn (opening) trades
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub profit_and_loss: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub fees: Option<Decimal>,
    /// Raw side value; see [`Trade::side`]
    pub side: i32,
    pub size: i64,
    #[serde(default)]
    pub voided: Option<bool>,
    #[serde(default)]
    pub order_id: Option<i64>,
}

impl Trade {
    pub fn side(&self) -> Option<OrderSide> {
        OrderSide::try_from(self.side).ok()
    }

    /// An opening leg with no realized P&L yet.
    pub fn is_half_turn(&self) -> bool {
        self.profit_and_loss.is_none()
    }

    pub fn is_voided(&self) -> bool {
        self.voided.unwrap_or(false)
    }
}

/// Request for POST /api/Trade/search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTradesRequest {
    pub account_id: i64,
    pub start_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<DateTime<Utc>>,
}

impl SearchTradesRequest {
    pub fn new(account_id: i64, start_timestamp: DateTime<Utc>) -> Self {
        Self {
            account_id,
            start_timestamp,
            end_timestamp: None,
        }
    }

    pub fn with_end(mut self, end_timestamp: DateTime<Utc>) -> Self {
        self.end_timestamp = Some(end_timestamp);
        self
    }

    /// Whether a trade falls inside `[start, end]`. Trades without a
    /// timestamp are kept.
    pub fn contains(&self, trade: &Trade) -> bool {
        let Some(ts) = trade.creation_timestamp else {
            return true;
        };
        ts >= self.start_timestamp && self.end_timestamp.map_or(true, |end| ts <= end)
    }
}

/// Response for POST /api/Trade/search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub trades: Vec<Trade>,
}
