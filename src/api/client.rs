//! TopstepX REST API client implementation.
//!
//! The [`TopstepXClient`] provides a type-safe interface for interacting with
//! the TopstepX REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use topstepx::api::TopstepXClient;
//! use topstepx::auth::TopstepXAuth;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Arc::new(TopstepXAuth::new("username", "api_key")?);
//!     let client = TopstepXClient::new(auth)?;
//!
//!     let accounts = client.get_active_accounts().await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult, ErrorCategory, ErrorResponse};
use crate::api::types::*;
use crate::auth::{AuthError, TopstepXAuth};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`TopstepXClient`].
#[derive(Debug, Clone)]
pub struct TopstepXClientBuilder {
    auth: Arc<TopstepXAuth>,
    base_url: Option<String>,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl TopstepXClientBuilder {
    /// Create a new builder around a shared authenticator.
    pub fn new(auth: impl Into<Arc<TopstepXAuth>>) -> Self {
        Self {
            auth: auth.into(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    /// Override the API base URL. Defaults to the authenticator's base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<TopstepXClient> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.default_headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str())
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = reqwest::header::HeaderValue::from_str(&value)
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(headers)
            .build()?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| self.auth.base_url().to_string());

        Ok(TopstepXClient {
            http_client,
            base_url,
            auth: self.auth,
        })
    }
}

/// TopstepX REST API client.
///
/// Every call asks the shared [`TopstepXAuth`] for a valid token first, so an
/// expired session is refreshed transparently before the request goes out.
#[derive(Debug, Clone)]
pub struct TopstepXClient {
    http_client: Client,
    base_url: String,
    auth: Arc<TopstepXAuth>,
}

impl TopstepXClient {
    /// Create a new client with default settings (30s timeout, connection pooling).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(auth: impl Into<Arc<TopstepXAuth>>) -> ApiResult<Self> {
        TopstepXClientBuilder::new(auth).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(auth: impl Into<Arc<TopstepXAuth>>) -> TopstepXClientBuilder {
        TopstepXClientBuilder::new(auth)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The authenticator this client draws tokens from.
    pub fn auth(&self) -> &Arc<TopstepXAuth> {
        &self.auth
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// POST a JSON body with a fresh bearer token and decode the response.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        category: ErrorCategory,
    ) -> ApiResult<T> {
        let token = self.auth.get_valid_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(path, status = %status, "TopstepX request completed");

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                tracing::warn!(path, "Token rejected by server, invalidating session");
                self.auth.invalidate_token(&token).await;
            }
            return Err(Self::parse_error_response(response, category).await);
        }

        let text = response.text().await?;
        Self::parse_body(&text, category)
    }

    /// Check the `success`/`errorCode` envelope, then decode the payload.
    fn parse_body<T: DeserializeOwned>(text: &str, category: ErrorCategory) -> ApiResult<T> {
        let envelope: ApiStatus = serde_json::from_str(text).map_err(|e| {
            ApiError::Deserialize(format!("Failed to deserialize response: {}", e))
        })?;

        if !envelope.is_success() {
            return Err(ApiError::from_category(category, envelope.to_error_response()));
        }

        serde_json::from_str(text)
            .map_err(|e| ApiError::Deserialize(format!("Failed to deserialize response: {}", e)))
    }

    /// Parse an error response into an ApiError.
    async fn parse_error_response(response: reqwest::Response, category: ErrorCategory) -> ApiError {
        let status = response.status();
        let error_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read error response body: {}", e);
                return Self::map_status_error(
                    status,
                    category,
                    ErrorResponse::from_text(format!("HTTP {} (body unreadable: {})", status, e)),
                );
            }
        };

        let error_response = serde_json::from_str::<ErrorResponse>(&error_text)
            .unwrap_or_else(|_| ErrorResponse::from_text(error_text))
            .with_status(status.as_u16());

        Self::map_status_error(status, category, error_response)
    }

    /// Map HTTP status code to ApiError.
    fn map_status_error(status: StatusCode, category: ErrorCategory, response: ErrorResponse) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                ApiError::Authentication(AuthError::Unauthorized(response.get_message()))
            }
            _ => ApiError::from_category(category, response.with_status(status.as_u16())),
        }
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn validate_id(value: i64, field_name: &str) -> ApiResult<()> {
        if value <= 0 {
            return Err(ApiError::InvalidParameter(format!(
                "{} must be positive, got {}",
                field_name, value
            )));
        }
        Ok(())
    }

    fn validate_contract_id(contract_id: &str) -> ApiResult<()> {
        if contract_id.trim().is_empty() {
            return Err(ApiError::InvalidParameter("contract_id cannot be empty".to_string()));
        }
        Ok(())
    }

    fn validate_time_range(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> ApiResult<()> {
        if let Some(end) = end {
            if end < start {
                return Err(ApiError::InvalidParameter(format!(
                    "end timestamp {} is before start timestamp {}",
                    end, start
                )));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Account endpoints
    // =========================================================================

    /// Get active accounts.
    pub async fn get_active_accounts(&self) -> ApiResult<Vec<Account>> {
        self.search_accounts(true).await
    }

    /// Search accounts, optionally restricted to active ones.
    pub async fn search_accounts(&self, only_active: bool) -> ApiResult<Vec<Account>> {
        let request = SearchAccountsRequest {
            only_active_accounts: only_active,
        };
        let response: AccountsResponse = self
            .post("/api/Account/search", &request, ErrorCategory::Api)
            .await?;
        Ok(response.accounts)
    }

    // =========================================================================
    // Contract endpoints
    // =========================================================================

    /// Get available contracts (`live = false` for the simulated feed).
    pub async fn get_available_contracts(&self, live: bool) -> ApiResult<Vec<Contract>> {
        let request = AvailableContractsRequest { live };
        let response: ContractsResponse = self
            .post("/api/Contract/available", &request, ErrorCategory::Api)
            .await?;
        Ok(response.contracts)
    }

    /// Search contracts by name/symbol text.
    pub async fn search_contracts(&self, search_text: &str, live: bool) -> ApiResult<Vec<Contract>> {
        if search_text.trim().is_empty() {
            return Err(ApiError::InvalidParameter("search_text cannot be empty".to_string()));
        }
        let request = SearchContractsRequest {
            search_text: search_text.to_string(),
            live,
        };
        let response: ContractsResponse = self
            .post("/api/Contract/search", &request, ErrorCategory::Api)
            .await?;
        Ok(response.contracts)
    }

    // =========================================================================
    // Order endpoints
    // =========================================================================

    /// Place an order.
    ///
    /// The request is validated locally first (e.g. a Limit order without a
    /// limit price never reaches the server).
    pub async fn place_order(&self, request: PlaceOrderRequest) -> ApiResult<PlaceOrderResponse> {
        Self::validate_id(request.account_id, "account_id")?;
        request.validate()?;

        let response: PlaceOrderResponse = self
            .post("/api/Order/place", &request, ErrorCategory::Order)
            .await?;
        tracing::info!(
            account_id = request.account_id,
            contract_id = %request.contract_id,
            order_type = %request.order_type,
            side = %request.side,
            size = request.size,
            order_id = ?response.order_id,
            "Order placed"
        );
        Ok(response)
    }

    /// Search orders created within a time range.
    pub async fn search_orders(
        &self,
        account_id: i64,
        start_timestamp: DateTime<Utc>,
        end_timestamp: Option<DateTime<Utc>>,
    ) -> ApiResult<Vec<Order>> {
        Self::validate_id(account_id, "account_id")?;
        Self::validate_time_range(start_timestamp, end_timestamp)?;

        let request = SearchOrdersRequest {
            account_id,
            start_timestamp,
            end_timestamp,
        };
        let response: OrdersResponse = self
            .post("/api/Order/search", &request, ErrorCategory::Order)
            .await?;
        Ok(response.orders)
    }

    /// Get open (working) orders for an account.
    pub async fn get_open_orders(&self, account_id: i64) -> ApiResult<Vec<Order>> {
        Self::validate_id(account_id, "account_id")?;
        let request = AccountRequest { account_id };
        let response: OrdersResponse = self
            .post("/api/Order/searchOpen", &request, ErrorCategory::Order)
            .await?;
        Ok(response.orders)
    }

    /// Cancel an order.
    pub async fn cancel_order(&self, account_id: i64, order_id: i64) -> ApiResult<ApiStatus> {
        Self::validate_id(account_id, "account_id")?;
        Self::validate_id(order_id, "order_id")?;

        let request = CancelOrderRequest {
            account_id,
            order_id,
        };
        self.post("/api/Order/cancel", &request, ErrorCategory::Order)
            .await
    }

    /// Modify an open order. Only the fields set on the request change.
    pub async fn modify_order(&self, request: ModifyOrderRequest) -> ApiResult<ApiStatus> {
        Self::validate_id(request.account_id, "account_id")?;
        Self::validate_id(request.order_id, "order_id")?;
        request.validate()?;

        self.post("/api/Order/modify", &request, ErrorCategory::Order)
            .await
    }

    // =========================================================================
    // Position endpoints
    // =========================================================================

    /// Get open positions for an account.
    pub async fn get_open_positions(&self, account_id: i64) -> ApiResult<Vec<Position>> {
        Self::validate_id(account_id, "account_id")?;
        let request = AccountRequest { account_id };
        let response: PositionsResponse = self
            .post("/api/Position/searchOpen", &request, ErrorCategory::Position)
            .await?;
        Ok(response.positions)
    }

    /// Close an entire position at market.
    pub async fn close_position(&self, account_id: i64, contract_id: &str) -> ApiResult<ApiStatus> {
        Self::validate_id(account_id, "account_id")?;
        Self::validate_contract_id(contract_id)?;

        let request = ClosePositionRequest {
            account_id,
            contract_id: contract_id.to_string(),
        };
        self.post("/api/Position/closeContract", &request, ErrorCategory::Position)
            .await
    }

    /// Close part of a position.
    pub async fn partial_close_position(
        &self,
        account_id: i64,
        contract_id: &str,
        size: u32,
    ) -> ApiResult<ApiStatus> {
        Self::validate_id(account_id, "account_id")?;
        Self::validate_contract_id(contract_id)?;
        if size == 0 {
            return Err(ApiError::InvalidParameter("size must be greater than zero".to_string()));
        }

        let request = PartialClosePositionRequest {
            account_id,
            contract_id: contract_id.to_string(),
            size,
        };
        self.post(
            "/api/Position/partialCloseContract",
            &request,
            ErrorCategory::Position,
        )
        .await
    }

    // =========================================================================
    // Trade endpoints
    // =========================================================================

    /// Search trades executed within `[start, end]`.
    ///
    /// Returned trades outside the range are dropped; trades the server sends
    /// without a `creationTimestamp` cannot be placed and are kept.
    ///
    /// Half-turn (opening) trades come back with `profit_and_loss == None`.
    pub async fn search_trades(
        &self,
        account_id: i64,
        start_timestamp: DateTime<Utc>,
        end_timestamp: Option<DateTime<Utc>>,
    ) -> ApiResult<Vec<Trade>> {
        Self::validate_id(account_id, "account_id")?;
        Self::validate_time_range(start_timestamp, end_timestamp)?;

        let request = SearchTradesRequest {
            account_id,
            start_timestamp,
            end_timestamp,
        };
        let response: TradesResponse = self
            .post("/api/Trade/search", &request, ErrorCategory::Api)
            .await?;

        let total = response.trades.len();
        let trades: Vec<Trade> = response
            .trades
            .into_iter()
            .filter(|t| request.contains(t))
            .collect();
        if trades.len() != total {
            tracing::debug!(
                dropped = total - trades.len(),
                "Dropped trades outside the requested range"
            );
        }
        Ok(trades)
    }
}
