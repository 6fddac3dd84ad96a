//! Integration tests for the TopstepX REST API types.
//!
//! These tests verify serialization/deserialization of the wire types through
//! the public API. HTTP behavior is covered in `client_integration.rs`.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use topstepx::api::*;

// =============================================================================
// Type Serialization/Deserialization Tests
// =============================================================================

mod envelope_types {
    use super::*;

    #[test]
    fn test_status_success() {
        let json = r#"{"success": true, "errorCode": 0, "errorMessage": null}"#;
        let status: ApiStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_success());
    }

    #[test]
    fn test_status_nonzero_code_is_failure() {
        // success=true with a nonzero code is still a failure
        let json = r#"{"success": true, "errorCode": 3, "errorMessage": "Contract not found"}"#;
        let status: ApiStatus = serde_json::from_str(json).unwrap();
        assert!(!status.is_success());

        let response = status.to_error_response();
        assert_eq!(response.error_code, Some(3));
        assert_eq!(response.get_message(), "Contract not found (error code 3)");
    }

    #[test]
    fn test_place_order_response_flattens_status() {
        let json = r#"{"orderId": 9056, "success": true, "errorCode": 0, "errorMessage": null}"#;
        let response: PlaceOrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.order_id, Some(9056));
        assert!(response.status.is_success());
    }
}

mod order_types {
    use super::*;

    #[test]
    fn test_order_type_wire_values() {
        for (order_type, value) in [
            (OrderType::Limit, 1),
            (OrderType::Market, 2),
            (OrderType::Stop, 4),
            (OrderType::TrailingStop, 5),
            (OrderType::JoinBid, 6),
            (OrderType::JoinAsk, 7),
        ] {
            assert_eq!(serde_json::to_string(&order_type).unwrap(), value.to_string());
        }
        assert!(serde_json::from_str::<OrderType>("3").is_err());
    }

    #[test]
    fn test_order_side_serialize() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), "0");
        assert_eq!(serde_json::to_string(&OrderSide::Sell).unwrap(), "1");
        assert_eq!(OrderSide::Buy.opposite(), OrderSide::Sell);
    }

    #[test]
    fn test_place_order_request_serialize() {
        let request = PlaceOrderRequest::stop(101, "CON.F.US.NQ.M25", OrderSide::Sell, 1, Decimal::new(18250, 0))
            .with_custom_tag("stop-1");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["accountId"], 101);
        assert_eq!(json["contractId"], "CON.F.US.NQ.M25");
        assert_eq!(json["type"], 4);
        assert_eq!(json["side"], 1);
        assert_eq!(json["size"], 1);
        assert_eq!(json["stopPrice"], 18250.0);
        assert_eq!(json["customTag"], "stop-1");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_order_validation_rules() {
        let missing = PlaceOrderRequest::new(1, "CON.F.US.EP.M25", OrderType::Stop, OrderSide::Buy, 1);
        assert_eq!(
            missing.validate(),
            Err(OrderValidationError::MissingPrice {
                order_type: OrderType::Stop,
                field: PriceField::Stop,
            })
        );

        let extra = PlaceOrderRequest::market(1, "CON.F.US.EP.M25", OrderSide::Buy, 1)
            .with_limit_price(Decimal::new(5000, 0));
        assert!(matches!(
            extra.validate(),
            Err(OrderValidationError::UnexpectedPrice { .. })
        ));

        let zero = PlaceOrderRequest::market(1, "CON.F.US.EP.M25", OrderSide::Buy, 0);
        assert_eq!(zero.validate(), Err(OrderValidationError::ZeroSize));
    }

    #[test]
    fn test_order_record_unknown_status_passes_through() {
        let json = r#"{
            "id": 1, "accountId": 2, "contractId": "CON.F.US.EP.M25",
            "status": 6, "type": 1, "side": 0, "size": 1, "limitPrice": 5200.5
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status, 6);
        assert_eq!(order.status(), None);
        assert_eq!(order.order_type(), Some(OrderType::Limit));
        assert_eq!(order.limit_price, Some(Decimal::new(52005, 1)));
    }
}

mod position_types {
    use super::*;

    #[test]
    fn test_positions_response_deserialize() {
        let json = r#"{
            "positions": [{
                "id": 6124, "accountId": 536, "contractId": "CON.F.US.GMET.J25",
                "creationTimestamp": "2025-04-21T19:52:32.175721+00:00",
                "type": 0, "size": 2, "averagePrice": 1575.75
            }],
            "success": true, "errorCode": 0, "errorMessage": null
        }"#;
        let response: PositionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.positions.len(), 1);
        assert!(response.positions[0].is_long());
        assert_eq!(response.positions[0].average_price, Some(Decimal::new(157575, 2)));
    }

    #[test]
    fn test_partial_close_request_serialize() {
        let request = PartialClosePositionRequest {
            account_id: 536,
            contract_id: "CON.F.US.GMET.J25".to_string(),
            size: 1,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"accountId":536,"contractId":"CON.F.US.GMET.J25","size":1}"#);
    }
}

mod trade_types {
    use super::*;

    #[test]
    fn test_trade_search_request_serialize() {
        let start = Utc.with_ymd_and_hms(2025, 1, 20, 15, 47, 39).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 30, 15, 47, 39).unwrap();
        let request = SearchTradesRequest::new(203, start).with_end(end);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["accountId"], 203);
        assert_eq!(json["startTimestamp"], "2025-01-20T15:47:39Z");
        assert_eq!(json["endTimestamp"], "2025-01-30T15:47:39Z");
    }

    #[test]
    fn test_trades_response_missing_list_defaults_empty() {
        let json = r#"{"success": true, "errorCode": 0, "errorMessage": null}"#;
        let response: TradesResponse = serde_json::from_str(json).unwrap();
        assert!(response.trades.is_empty());
    }
}

mod account_types {
    use super::*;

    #[test]
    fn test_contract_deserialize() {
        let json = r#"{
            "id": "CON.F.US.ENQ.H25",
            "name": "ENQH25",
            "description": "E-mini NASDAQ-100: March 2025",
            "tickSize": 0.25,
            "tickValue": 5,
            "activeContract": true
        }"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.id, "CON.F.US.ENQ.H25");
        assert_eq!(contract.tick_value, Some(Decimal::new(5, 0)));
        assert!(contract.symbol_id.is_none());
    }

    #[test]
    fn test_account_minimal() {
        let json = r#"{"id": 7, "name": "PRAC-7"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(account.balance.is_none());
        assert!(!account.is_tradable());
    }
}

mod error_types {
    use super::*;

    #[test]
    fn test_error_response_standard_format() {
        let json = r#"{"success": false, "errorCode": 2, "errorMessage": "Order rejected"}"#;
        let response: ErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.get_message(), "Order rejected (error code 2)");
    }

    #[test]
    fn test_error_response_fallback() {
        let response: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.get_message(), "Unknown error");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Order(ErrorResponse::new(Some(2), Some("Insufficient margin".to_string())));
        assert_eq!(format!("{}", err), "Order error: Insufficient margin (error code 2)");

        let err = ApiError::Position(ErrorResponse::from_text("Position not found"));
        assert_eq!(format!("{}", err), "Position error: Position not found");

        let err = ApiError::InvalidOrder(OrderValidationError::ZeroSize);
        assert_eq!(format!("{}", err), "Invalid order: order size must be greater than zero");
    }
}
