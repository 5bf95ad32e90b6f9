//! HTTP client for the remote order/item service
//!
//! One `handle_response` funnel distinguishes 204 No Content from
//! success-with-body and turns every non-success response into a
//! [`ClientError`] carrying the service's human-readable error body.

use crate::{ClientConfig, ClientError, ClientResult};
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{DailySalesReport, Item, ItemPayload, Order, OrderLineUpsert, OrderStatus, OrderUpdate};

/// Marker the service puts in the checkout error body when the fiscal
/// integration behind it is not reachable.
const FISCAL_UNAVAILABLE_MARKER: &str = "PRA IMS unavailable";

/// HTTP client for the POS service API
#[derive(Debug, Clone)]
pub struct PosApi {
    client: Client,
    base_url: String,
}

impl PosApi {
    /// Create a new API client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.get(self.url(path)).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.post(self.url(path)).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a PUT request with JSON body
    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.put(self.url(path)).json(body).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a PATCH request with JSON body
    async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self.client.patch(self.url(path)).json(body).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a PATCH request without body
    async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.patch(self.url(path)).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a DELETE request expecting a body back
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.client.delete(self.url(path)).send().await?;
        require_body(handle_response(response).await?)
    }

    /// Make a DELETE request where 204 No Content is the expected outcome
    async fn delete_no_content(&self, path: &str) -> ClientResult<()> {
        let response = self.client.delete(self.url(path)).send().await?;
        let _: Option<serde_json::Value> = handle_response(response).await?;
        Ok(())
    }

    // ========== Items API ==========

    /// List catalog items; inactive items are included only on request
    pub async fn list_items(&self, include_inactive: bool) -> ClientResult<Vec<Item>> {
        self.get(&format!("api/items?includeInactive={include_inactive}")).await
    }

    /// Create a catalog item
    pub async fn create_item(&self, payload: &ItemPayload) -> ClientResult<Item> {
        validate_item_payload(payload)?;
        self.post("api/items", payload).await
    }

    /// Update a catalog item
    pub async fn update_item(&self, id: &str, payload: &ItemPayload) -> ClientResult<Item> {
        validate_item_payload(payload)?;
        self.put(&format!("api/items/{id}"), payload).await
    }

    /// Soft-delete a catalog item (the service answers 204 No Content)
    pub async fn delete_item(&self, id: &str) -> ClientResult<()> {
        self.delete_no_content(&format!("api/items/{id}")).await
    }

    /// Flip a catalog item's active flag
    pub async fn toggle_item_active(&self, id: &str) -> ClientResult<Item> {
        self.patch_empty(&format!("api/items/{id}/toggle-active")).await
    }

    // ========== Orders API ==========

    /// List orders, optionally filtered by status
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> ClientResult<Vec<Order>> {
        let path = match status {
            Some(status) => format!("api/orders?status={status}"),
            None => "api/orders".to_string(),
        };
        self.get(&path).await
    }

    /// Create a new empty DRAFT order
    pub async fn create_order(&self) -> ClientResult<Order> {
        tracing::debug!("creating new draft order");
        self.post_empty("api/orders").await
    }

    /// Fetch an order by id
    pub async fn get_order(&self, id: &str) -> ClientResult<Order> {
        self.get(&format!("api/orders/{id}")).await
    }

    /// Partially update an order's customer details, discount or payment mode
    pub async fn update_order(&self, id: &str, update: &OrderUpdate) -> ClientResult<Order> {
        self.patch(&format!("api/orders/{id}"), update).await
    }

    /// Upsert an order line; the service recomputes all totals and
    /// returns the full order
    pub async fn upsert_order_line(&self, order_id: &str, line: &OrderLineUpsert) -> ClientResult<Order> {
        self.post(&format!("api/orders/{order_id}/items"), line).await
    }

    /// Delete an order line by catalog item id
    pub async fn remove_order_line(&self, order_id: &str, item_id: &str) -> ClientResult<Order> {
        self.delete(&format!("api/orders/{order_id}/items/{item_id}")).await
    }

    /// Check out an order; the service assigns the fiscal invoice fields
    pub async fn checkout_order(&self, id: &str) -> ClientResult<Order> {
        self.post_empty(&format!("api/orders/{id}/checkout")).await
    }

    /// Cancel an order
    pub async fn cancel_order(&self, id: &str) -> ClientResult<Order> {
        self.post_empty(&format!("api/orders/{id}/cancel")).await
    }

    // ========== Reports API ==========

    /// Daily sales report for one calendar day (PAID orders only)
    pub async fn daily_sales(&self, date: NaiveDate) -> ClientResult<DailySalesReport> {
        self.get(&format!("api/reports/daily-sales?date={date}")).await
    }
}

/// Handle the HTTP response
async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<Option<T>> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await?;
        let message = extract_message(&body, status);
        if status == StatusCode::BAD_GATEWAY && message.contains(FISCAL_UNAVAILABLE_MARKER) {
            return Err(ClientError::FiscalUnavailable);
        }
        tracing::warn!(status = status.as_u16(), %message, "service returned an error");
        return Err(ClientError::Api { status: status.as_u16(), message });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    Ok(Some(response.json().await?))
}

fn require_body<T>(body: Option<T>) -> ClientResult<T> {
    body.ok_or_else(|| ClientError::InvalidResponse("Missing response body".to_string()))
}

/// Pull the human-readable message out of an error body.
///
/// The service wraps errors as `{timestamp, status, error, message, path}`;
/// anything else is surfaced verbatim.
fn extract_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        body.to_string()
    }
}

/// Validate an item payload before it leaves the client.
///
/// Mirrors the service's rules so admin mistakes fail fast: non-blank
/// name/category/item code, a positive finite price, and the fiscal
/// tariff code at exactly 8 characters (content is the service's
/// business, only the length is checked here).
fn validate_item_payload(payload: &ItemPayload) -> ClientResult<()> {
    if payload.name.trim().is_empty() {
        return Err(ClientError::Validation("Item name is required".to_string()));
    }
    if payload.category.trim().is_empty() {
        return Err(ClientError::Validation("Category is required".to_string()));
    }
    if payload.item_code.trim().is_empty() {
        return Err(ClientError::Validation("Item code is required".to_string()));
    }
    if payload.pct_code.chars().count() != 8 {
        return Err(ClientError::Validation("PCT code must be exactly 8 characters".to_string()));
    }
    if !payload.price.is_finite() || payload.price <= 0.0 {
        return Err(ClientError::Validation("Price must be greater than zero".to_string()));
    }
    Ok(())
}
