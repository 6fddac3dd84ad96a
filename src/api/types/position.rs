//! Position-related types for the TopstepX REST API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::InvalidEnumValueError;

/// Position direction (serializes as integer: 0=Long, 1=Short).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum PositionType {
    Long = 0,
    Short = 1,
}

impl TryFrom<i32> for PositionType {
    type Error = InvalidEnumValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Long),
            1 => Ok(Self::Short),
            _ => Err(InvalidEnumValueError {
                kind: "position type",
                value,
            }),
        }
    }
}

impl From<PositionType> for i32 {
    fn from(position_type: PositionType) -> Self {
        position_type as i32
    }
}

/// Open position in a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: i64,
    pub account_id: i64,
    pub contract_id: String,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    /// Raw direction value; see [`Position::position_type`]
    #[serde(rename = "type")]
    pub position_type: i32,
    /// Number of contracts held
    pub size: i64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub average_price: Option<Decimal>,
}

impl Position {
    pub fn position_type(&self) -> Option<PositionType> {
        PositionType::try_from(self.position_type).ok()
    }

    pub fn is_long(&self) -> bool {
        self.position_type() == Some(PositionType::Long)
    }

    pub fn is_short(&self) -> bool {
        self.position_type() == Some(PositionType::Short)
    }
}

/// Response for POST /api/Position/searchOpen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionsResponse {
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// Request for POST /api/Position/closeContract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePositionRequest {
    pub account_id: i64,
    pub contract_id: String,
}

/// Request for POST /api/Position/partialCloseContract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialClosePositionRequest {
    pub account_id: i64,
    pub contract_id: String,
    /// Number of contracts to close
    pub size: u32,
}
