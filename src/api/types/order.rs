//! Order-related types for the TopstepX REST API.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::status::ApiStatus;

/// Error returned when a wire integer does not map to a known enum value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEnumValueError {
    pub kind: &'static str,
    pub value: i32,
}

impl fmt::Display for InvalidEnumValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for InvalidEnumValueError {}

// ─── OrderType ───────────────────────────────────────────────────────────────

/// Order type (serializes as integer: 1=Limit, 2=Market, 4=Stop,
/// 5=TrailingStop, 6=JoinBid, 7=JoinAsk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum OrderType {
    Limit = 1,
    Market = 2,
    Stop = 4,
    TrailingStop = 5,
    /// Joins the best bid
    JoinBid = 6,
    /// Joins the best ask
    JoinAsk = 7,
}

impl OrderType {
    /// The price field this order type must carry, if any.
    pub fn required_price(&self) -> Option<PriceField> {
        match self {
            OrderType::Limit => Some(PriceField::Limit),
            OrderType::Stop => Some(PriceField::Stop),
            OrderType::TrailingStop => Some(PriceField::Trail),
            OrderType::Market | OrderType::JoinBid | OrderType::JoinAsk => None,
        }
    }
}

impl TryFrom<i32> for OrderType {
    type Error = InvalidEnumValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Limit),
            2 => Ok(Self::Market),
            4 => Ok(Self::Stop),
            5 => Ok(Self::TrailingStop),
            6 => Ok(Self::JoinBid),
            7 => Ok(Self::JoinAsk),
            _ => Err(InvalidEnumValueError {
                kind: "order type",
                value,
            }),
        }
    }
}

impl From<OrderType> for i32 {
    fn from(order_type: OrderType) -> Self {
        order_type as i32
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "Limit"),
            OrderType::Market => write!(f, "Market"),
            OrderType::Stop => write!(f, "Stop"),
            OrderType::TrailingStop => write!(f, "TrailingStop"),
            OrderType::JoinBid => write!(f, "JoinBid"),
            OrderType::JoinAsk => write!(f, "JoinAsk"),
        }
    }
}

// ─── OrderSide ───────────────────────────────────────────────────────────────

/// Order side (serializes as integer: 0=Buy, 1=Sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum OrderSide {
    /// Bid
    Buy = 0,
    /// Ask
    Sell = 1,
}

impl OrderSide {
    pub fn opposite(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl TryFrom<i32> for OrderSide {
    type Error = InvalidEnumValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Buy),
            1 => Ok(Self::Sell),
            _ => Err(InvalidEnumValueError {
                kind: "order side",
                value,
            }),
        }
    }
}

impl From<OrderSide> for i32 {
    fn from(side: OrderSide) -> Self {
        side as i32
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "Buy"),
            OrderSide::Sell => write!(f, "Sell"),
        }
    }
}

// ─── OrderStatus ─────────────────────────────────────────────────────────────

/// Order status (serializes as integer: 1=Pending, 2=Filled, 3=Cancelled, 4=Rejected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum OrderStatus {
    /// Open / working
    Pending = 1,
    Filled = 2,
    Cancelled = 3,
    Rejected = 4,
}

impl TryFrom<i32> for OrderStatus {
    type Error = InvalidEnumValueError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Pending),
            2 => Ok(Self::Filled),
            3 => Ok(Self::Cancelled),
            4 => Ok(Self::Rejected),
            _ => Err(InvalidEnumValueError {
                kind: "order status",
                value,
            }),
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        status as i32
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Price fields an order request can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    Limit,
    Stop,
    Trail,
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Limit => write!(f, "limitPrice"),
            PriceField::Stop => write!(f, "stopPrice"),
            PriceField::Trail => write!(f, "trailPrice"),
        }
    }
}

/// Client-side order validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("order size must be greater than zero")]
    ZeroSize,

    #[error("contract id cannot be empty")]
    EmptyContractId,

    #[error("{order_type} order requires {field}")]
    MissingPrice {
        order_type: OrderType,
        field: PriceField,
    },

    #[error("{order_type} order does not accept {field}")]
    UnexpectedPrice {
        order_type: OrderType,
        field: PriceField,
    },

    #[error("{field} must be positive, got {price}")]
    NonPositivePrice { field: PriceField, price: Decimal },

    #[error("modification must change at least one of size, limitPrice, stopPrice, trailPrice")]
    EmptyModification,
}

fn check_positive(field: PriceField, price: Option<Decimal>) -> Result<(), OrderValidationError> {
    match price {
        Some(p) if p <= Decimal::ZERO => Err(OrderValidationError::NonPositivePrice { field, price: p }),
        _ => Ok(()),
    }
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Request for POST /api/Order/place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub account_id: i64,
    pub contract_id: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    pub size: u32,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub stop_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub trail_price: Option<Decimal>,
    #[serde(default)]
    pub custom_tag: Option<String>,
    /// Linked order (OCO)
    #[serde(default)]
    pub linked_order_id: Option<i64>,
}

impl PlaceOrderRequest {
    /// Create a request with no prices set.
    pub fn new(
        account_id: i64,
        contract_id: impl Into<String>,
        order_type: OrderType,
        side: OrderSide,
        size: u32,
    ) -> Self {
        Self {
            account_id,
            contract_id: contract_id.into(),
            order_type,
            side,
            size,
            limit_price: None,
            stop_price: None,
            trail_price: None,
            custom_tag: None,
            linked_order_id: None,
        }
    }

    pub fn market(account_id: i64, contract_id: impl Into<String>, side: OrderSide, size: u32) -> Self {
        Self::new(account_id, contract_id, OrderType::Market, side, size)
    }

    pub fn limit(
        account_id: i64,
        contract_id: impl Into<String>,
        side: OrderSide,
        size: u32,
        limit_price: Decimal,
    ) -> Self {
        Self::new(account_id, contract_id, OrderType::Limit, side, size).with_limit_price(limit_price)
    }

    pub fn stop(
        account_id: i64,
        contract_id: impl Into<String>,
        side: OrderSide,
        size: u32,
        stop_price: Decimal,
    ) -> Self {
        Self::new(account_id, contract_id, OrderType::Stop, side, size).with_stop_price(stop_price)
    }

    pub fn with_limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, price: Decimal) -> Self {
        self.stop_price = Some(price);
        self
    }

    pub fn with_trail_price(mut self, price: Decimal) -> Self {
        self.trail_price = Some(price);
        self
    }

    pub fn with_custom_tag(mut self, tag: impl Into<String>) -> Self {
        self.custom_tag = Some(tag.into());
        self
    }

    pub fn with_linked_order(mut self, order_id: i64) -> Self {
        self.linked_order_id = Some(order_id);
        self
    }

    fn price(&self, field: PriceField) -> Option<Decimal> {
        match field {
            PriceField::Limit => self.limit_price,
            PriceField::Stop => self.stop_price,
            PriceField::Trail => self.trail_price,
        }
    }

    /// Check required-field presence for the order type.
    ///
    /// A price that the order type does not use is an error rather than
    /// being dropped silently.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.size == 0 {
            return Err(OrderValidationError::ZeroSize);
        }
        if self.contract_id.trim().is_empty() {
            return Err(OrderValidationError::EmptyContractId);
        }

        let required = self.order_type.required_price();
        for field in [PriceField::Limit, PriceField::Stop, PriceField::Trail] {
            let price = self.price(field);
            match (price, required == Some(field)) {
                (None, true) => {
                    return Err(OrderValidationError::MissingPrice {
                        order_type: self.order_type,
                        field,
                    })
                }
                (Some(_), false) => {
                    return Err(OrderValidationError::UnexpectedPrice {
                        order_type: self.order_type,
                        field,
                    })
                }
                _ => check_positive(field, price)?,
            }
        }
        Ok(())
    }
}

/// Response for POST /api/Order/place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    /// ID assigned to the new order
    #[serde(default)]
    pub order_id: Option<i64>,
    #[serde(flatten)]
    pub status: ApiStatus,
}

/// Request for POST /api/Order/modify. Unset fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyOrderRequest {
    pub account_id: i64,
    pub order_id: i64,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub stop_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub trail_price: Option<Decimal>,
}

impl ModifyOrderRequest {
    pub fn new(account_id: i64, order_id: i64) -> Self {
        Self {
            account_id,
            order_id,
            size: None,
            limit_price: None,
            stop_price: None,
            trail_price: None,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_limit_price(mut self, price: Decimal) -> Self {
        self.limit_price = Some(price);
        self
    }

    pub fn with_stop_price(mut self, price: Decimal) -> Self {
        self.stop_price = Some(price);
        self
    }

    pub fn with_trail_price(mut self, price: Decimal) -> Self {
        self.trail_price = Some(price);
        self
    }

    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.size.is_none()
            && self.limit_price.is_none()
            && self.stop_price.is_none()
            && self.trail_price.is_none()
        {
            return Err(OrderValidationError::EmptyModification);
        }
        if self.size == Some(0) {
            return Err(OrderValidationError::ZeroSize);
        }
        check_positive(PriceField::Limit, self.limit_price)?;
        check_positive(PriceField::Stop, self.stop_price)?;
        check_positive(PriceField::Trail, self.trail_price)
    }
}

/// Request for POST /api/Order/cancel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub account_id: i64,
    pub order_id: i64,
}

/// Request for POST /api/Order/search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOrdersRequest {
    pub account_id: i64,
    pub start_timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<DateTime<Utc>>,
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Order record from search endpoints.
///
/// Enum-valued fields are kept as the raw integers the server sent; use the
/// accessor methods for typed views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub account_id: i64,
    pub contract_id: String,
    #[serde(default)]
    pub symbol_id: Option<String>,
    #[serde(default)]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_timestamp: Option<DateTime<Utc>>,
    pub status: i32,
    #[serde(rename = "type")]
    pub order_type: i32,
    pub side: i32,
    pub size: i64,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub limit_price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub stop_price: Option<Decimal>,
    #[serde(default)]
    pub fill_volume: Option<i64>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub filled_price: Option<Decimal>,
    #[serde(default)]
    pub custom_tag: Option<String>,
}

impl Order {
    pub fn status(&self) -> Option<OrderStatus> {
        OrderStatus::try_from(self.status).ok()
    }

    pub fn order_type(&self) -> Option<OrderType> {
        OrderType::try_from(self.order_type).ok()
    }

    pub fn side(&self) -> Option<OrderSide> {
        OrderSide::try_from(self.side).ok()
    }

    pub fn is_open(&self) -> bool {
        self.status() == Some(OrderStatus::Pending)
    }
}

/// Response for order search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn test_order_type_values() {
        assert_eq!(i32::from(OrderType::Limit), 1);
        assert_eq!(i32::from(OrderType::Market), 2);
        assert_eq!(i32::from(OrderType::Stop), 4);
        assert_eq!(i32::from(OrderType::TrailingStop), 5);
        assert_eq!(i32::from(OrderType::JoinBid), 6);
        assert_eq!(i32::from(OrderType::JoinAsk), 7);
        assert!(OrderType::try_from(3).is_err());
    }

    #[test]
    fn test_order_side_values() {
        assert_eq!(i32::from(OrderSide::Buy), 0);
        assert_eq!(i32::from(OrderSide::Sell), 1);
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
        let err = OrderSide::try_from(2).unwrap_err();
        assert_eq!(err.to_string(), "invalid order side value: 2");
    }

    #[test]
    fn test_order_status_values() {
        assert_eq!(OrderStatus::try_from(1), Ok(OrderStatus::Pending));
        assert_eq!(OrderStatus::try_from(2), Ok(OrderStatus::Filled));
        assert_eq!(OrderStatus::try_from(3), Ok(OrderStatus::Cancelled));
        assert_eq!(OrderStatus::try_from(4), Ok(OrderStatus::Rejected));
    }

    #[test]
    fn test_limit_requires_limit_price() {
        let request = PlaceOrderRequest::new(1, "CON.F.US.EP.M25", OrderType::Limit, OrderSide::Buy, 1);
        assert_eq!(
            request.validate(),
            Err(OrderValidationError::MissingPrice {
                order_type: OrderType::Limit,
                field: PriceField::Limit,
            })
        );
        assert!(request.with_limit_price(price(5000)).validate().is_ok());
    }

    #[test]
    fn test_stop_and_trailing_require_their_price() {
        let stop = PlaceOrderRequest::new(1, "CON.F.US.EP.M25", OrderType::Stop, OrderSide::Sell, 1);
        assert!(matches!(
            stop.validate(),
            Err(OrderValidationError::MissingPrice { field: PriceField::Stop, .. })
        ));

        let trailing = PlaceOrderRequest::new(1, "CON.F.US.EP.M25", OrderType::TrailingStop, OrderSide::Sell, 1)
            .with_trail_price(price(10));
        assert!(trailing.validate().is_ok());
    }

    #[test]
    fn test_market_rejects_extra_price() {
        let request = PlaceOrderRequest::market(1, "CON.F.US.EP.M25", OrderSide::Buy, 1)
            .with_limit_price(price(5000));
        assert_eq!(
            request.validate(),
            Err(OrderValidationError::UnexpectedPrice {
                order_type: OrderType::Market,
                field: PriceField::Limit,
            })
        );
    }

    #[test]
    fn test_limit_rejects_stop_price() {
        let request = PlaceOrderRequest::limit(1, "CON.F.US.EP.M25", OrderSide::Buy, 1, price(5000))
            .with_stop_price(price(4990));
        assert!(matches!(
            request.validate(),
            Err(OrderValidationError::UnexpectedPrice { field: PriceField::Stop, .. })
        ));
    }

    #[test]
    fn test_join_orders_take_no_price() {
        let bid = PlaceOrderRequest::new(1, "CON.F.US.EP.M25", OrderType::JoinBid, OrderSide::Buy, 2);
        assert!(bid.validate().is_ok());
        let ask = bid.clone().with_trail_price(price(1));
        assert!(ask.validate().is_err());
    }

    #[test]
    fn test_zero_size_and_bad_prices_rejected() {
        let zero = PlaceOrderRequest::market(1, "CON.F.US.EP.M25", OrderSide::Buy, 0);
        assert_eq!(zero.validate(), Err(OrderValidationError::ZeroSize));

        let negative = PlaceOrderRequest::limit(1, "CON.F.US.EP.M25", OrderSide::Buy, 1, price(-1));
        assert!(matches!(
            negative.validate(),
            Err(OrderValidationError::NonPositivePrice { .. })
        ));

        let blank = PlaceOrderRequest::market(1, "  ", OrderSide::Buy, 1);
        assert_eq!(blank.validate(), Err(OrderValidationError::EmptyContractId));
    }

    #[test]
    fn test_modify_validation() {
        assert_eq!(
            ModifyOrderRequest::new(1, 2).validate(),
            Err(OrderValidationError::EmptyModification)
        );
        assert_eq!(
            ModifyOrderRequest::new(1, 2).with_size(0).validate(),
            Err(OrderValidationError::ZeroSize)
        );
        assert!(ModifyOrderRequest::new(1, 2).with_size(3).validate().is_ok());
        assert!(ModifyOrderRequest::new(1, 2)
            .with_stop_price(Decimal::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_order_accessors() {
        let json = r#"{
            "id": 10,
            "accountId": 1,
            "contractId": "CON.F.US.EP.M25",
            "status": 1,
            "type": 1,
            "side": 1,
            "size": 2,
            "limitPrice": 5200.25
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status(), Some(OrderStatus::Pending));
        assert_eq!(order.order_type(), Some(OrderType::Limit));
        assert_eq!(order.side(), Some(OrderSide::Sell));
        assert_eq!(order.limit_price, Some(Decimal::new(520025, 2)));
        assert!(order.is_open());
        assert!(order.stop_price.is_none());
    }

    #[test]
    fn test_unknown_status_is_passed_through() {
        let json = r#"{
            "id": 10, "accountId": 1, "contractId": "C",
            "status": 6, "type": 2, "side": 0, "size": 1
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, 6);
        assert_eq!(order.status(), None);
        assert!(!order.is_open());
    }
}
