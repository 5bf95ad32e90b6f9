//! In-process stand-in for the POS order/item service
//!
//! Implements the same contract the client talks to: camelCase JSON,
//! SCREAMING_SNAKE_CASE enums, absolute-quantity line upserts, totals
//! recomputed half-up on every mutation, and error bodies shaped as
//! `{timestamp, status, error, message, path}`. Every endpoint counts
//! its hits so tests can assert which calls actually went over the wire.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_decimal::prelude::*;
use serde::Deserialize;
use shared::models::{
    DailySalesReport, Item, Order, OrderItem, OrderLineUpsert, OrderStatus, OrderUpdate,
    PaymentMode,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Per-endpoint request counters
#[derive(Debug, Default, Clone)]
pub struct Hits {
    pub list_items: usize,
    pub delete_item: usize,
    pub create_order: usize,
    pub get_order: usize,
    pub patch_order: usize,
    pub upsert_line: usize,
    pub remove_line: usize,
    pub checkout: usize,
    pub cancel: usize,
    pub daily_sales: usize,
}

#[derive(Debug)]
pub struct ServerState {
    pub items: Vec<Item>,
    pub orders: HashMap<String, Order>,
    /// When false, checkout answers 502 the way the service does when
    /// its fiscal integration is down
    pub fiscal_available: bool,
    pub hits: Hits,
    next_order: u64,
    next_line: u64,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            orders: HashMap::new(),
            fiscal_available: true,
            hits: Hits::default(),
            next_order: 0,
            next_line: 0,
        }
    }
}

pub type SharedState = Arc<Mutex<ServerState>>;

/// Build a catalog item for seeding
pub fn seed_item(id: &str, name: &str, category: &str, price: f64) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        price,
        item_code: format!("CODE-{id}"),
        pct_code: "98211000".to_string(),
        is_active: true,
        created_at: None,
        updated_at: None,
    }
}

/// Start the mock service on an ephemeral port; returns its base URL
pub async fn spawn_server(state: SharedState) -> String {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().expect("mock server addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{addr}")
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/items", get(list_items))
        .route("/api/items/{id}", delete(delete_item))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}", get(get_order).patch(patch_order))
        .route("/api/orders/{id}/items", post(upsert_line))
        .route("/api/orders/{id}/items/{item_id}", delete(remove_line))
        .route("/api/orders/{id}/checkout", post(checkout))
        .route("/api/orders/{id}/cancel", post(cancel))
        .route("/api/reports/daily-sales", get(daily_sales))
        .with_state(state)
}

fn lock(state: &SharedState) -> MutexGuard<'_, ServerState> {
    state.lock().expect("mock server state poisoned")
}

/// Error body in the service's wrapper shape
fn error_response(status: StatusCode, message: &str, path: &str) -> Response {
    let body = serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or("Error"),
        "message": message,
        "path": path,
    });
    (status, Json(body)).into_response()
}

fn round2(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Recompute line totals, subtotal, tax and total, the way the service
/// does after every mutation
fn recalc(order: &mut Order) {
    let mut subtotal = Decimal::ZERO;
    for line in &mut order.items {
        let line_total =
            Decimal::from_f64(line.unit_price).unwrap_or_default() * Decimal::from(line.quantity);
        line.line_total = round2(line_total);
        subtotal += line_total;
    }
    let discount = Decimal::from_f64(order.discount.unwrap_or(0.0)).unwrap_or_default();
    let taxable = (subtotal - discount).max(Decimal::ZERO);
    let rate = match order.payment_mode.unwrap_or_default() {
        PaymentMode::Cash => 0.16,
        PaymentMode::Card => 0.05,
    };
    let gst = (taxable * Decimal::from_f64(rate).unwrap_or_default())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    order.subtotal = round2(subtotal);
    order.tax = round2(gst);
    order.gst_rate = Some(rate);
    order.gst_amount = Some(round2(gst));
    order.total = round2(taxable + gst);
}

fn guard_draft(order: &Order, path: &str) -> Result<(), Response> {
    if order.status.is_terminal() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "Only DRAFT orders can be modified",
            path,
        ));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListItemsQuery {
    #[serde(default)]
    include_inactive: bool,
}

async fn list_items(
    State(state): State<SharedState>,
    Query(query): Query<ListItemsQuery>,
) -> Json<Vec<Item>> {
    let mut guard = lock(&state);
    guard.hits.list_items += 1;
    let items = guard
        .items
        .iter()
        .filter(|item| query.include_inactive || item.is_active)
        .cloned()
        .collect();
    Json(items)
}

async fn delete_item(State(state): State<SharedState>, Path(id): Path<String>, uri: Uri) -> Response {
    let mut guard = lock(&state);
    guard.hits.delete_item += 1;
    match guard.items.iter_mut().find(|item| item.id == id) {
        Some(item) => {
            item.is_active = false;
            StatusCode::NO_CONTENT.into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "Item not found", uri.path()),
    }
}

async fn create_order(State(state): State<SharedState>) -> Json<Order> {
    let mut guard = lock(&state);
    guard.hits.create_order += 1;
    guard.next_order += 1;
    let id = format!("o-{}", guard.next_order);
    let order = Order {
        id: id.clone(),
        invoice_number: Some(format!("INV-{}", Uuid::new_v4().simple())),
        fiscal_invoice_number: None,
        fiscal_qr_text: None,
        fiscal_verification_url: None,
        subtotal: 0.0,
        tax: 0.0,
        total: 0.0,
        status: OrderStatus::Draft,
        payment_mode: None,
        gst_rate: None,
        gst_amount: None,
        customer_name: None,
        customer_phone: None,
        customer_cnic: None,
        customer_pntn: None,
        customer_tax_id: None,
        notes: None,
        discount: None,
        created_at: Some(chrono::Utc::now().to_rfc3339()),
        items: Vec::new(),
    };
    guard.orders.insert(id, order.clone());
    Json(order)
}

async fn get_order(State(state): State<SharedState>, Path(id): Path<String>, uri: Uri) -> Response {
    let mut guard = lock(&state);
    guard.hits.get_order += 1;
    match guard.orders.get(&id) {
        Some(order) => Json(order.clone()).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "Order not found", uri.path()),
    }
}

async fn patch_order(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    uri: Uri,
    Json(update): Json<OrderUpdate>,
) -> Response {
    let mut guard = lock(&state);
    guard.hits.patch_order += 1;
    let Some(order) = guard.orders.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "Order not found", uri.path());
    };
    if let Err(response) = guard_draft(order, uri.path()) {
        return response;
    }

    if let Some(name) = update.customer_name {
        order.customer_name = Some(name);
    }
    if let Some(phone) = update.customer_phone {
        order.customer_phone = Some(phone);
    }
    if let Some(cnic) = update.customer_cnic {
        order.customer_cnic = Some(cnic);
    }
    if let Some(pntn) = update.customer_pntn {
        order.customer_pntn = Some(pntn);
    }
    if let Some(tax_id) = update.customer_tax_id {
        order.customer_tax_id = Some(tax_id);
    }
    if let Some(notes) = update.notes {
        order.notes = Some(notes);
    }
    if let Some(discount) = update.discount {
        if discount < 0.0 {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Discount cannot be negative",
                uri.path(),
            );
        }
        order.discount = Some(discount);
    }
    if let Some(mode) = update.payment_mode {
        order.payment_mode = Some(mode);
    }
    recalc(order);
    Json(order.clone()).into_response()
}

async fn upsert_line(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    uri: Uri,
    Json(upsert): Json<OrderLineUpsert>,
) -> Response {
    let mut guard = lock(&state);
    guard.hits.upsert_line += 1;
    let Some(item) = guard.items.iter().find(|item| item.id == upsert.item_id).cloned() else {
        return error_response(StatusCode::NOT_FOUND, "Item not found", uri.path());
    };
    guard.next_line += 1;
    let line_id = format!("l-{}", guard.next_line);
    let Some(order) = guard.orders.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "Order not found", uri.path());
    };
    if let Err(response) = guard_draft(order, uri.path()) {
        return response;
    }
    if upsert.quantity < 1 {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Quantity must be at least 1",
            uri.path(),
        );
    }

    // Absolute quantity: one line per catalog item, replaced in place
    match order.items.iter_mut().find(|line| line.item_id == upsert.item_id) {
        Some(line) => line.quantity = upsert.quantity,
        None => order.items.push(OrderItem {
            id: line_id,
            item_id: item.id.clone(),
            item_name: item.name.clone(),
            quantity: upsert.quantity,
            unit_price: item.price,
            line_total: 0.0,
        }),
    }
    recalc(order);
    Json(order.clone()).into_response()
}

async fn remove_line(
    State(state): State<SharedState>,
    Path((id, item_id)): Path<(String, String)>,
    uri: Uri,
) -> Response {
    let mut guard = lock(&state);
    guard.hits.remove_line += 1;
    let Some(order) = guard.orders.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "Order not found", uri.path());
    };
    if let Err(response) = guard_draft(order, uri.path()) {
        return response;
    }
    let before = order.items.len();
    order.items.retain(|line| line.item_id != item_id);
    if order.items.len() == before {
        return error_response(StatusCode::NOT_FOUND, "Order item not found", uri.path());
    }
    recalc(order);
    Json(order.clone()).into_response()
}

async fn checkout(State(state): State<SharedState>, Path(id): Path<String>, uri: Uri) -> Response {
    let mut guard = lock(&state);
    guard.hits.checkout += 1;
    let fiscal_available = guard.fiscal_available;
    let Some(order) = guard.orders.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "Order not found", uri.path());
    };
    if let Err(response) = guard_draft(order, uri.path()) {
        return response;
    }
    if order.items.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Cannot checkout an empty order",
            uri.path(),
        );
    }
    if !fiscal_available {
        return error_response(
            StatusCode::BAD_GATEWAY,
            "PRA IMS unavailable: Connection refused",
            uri.path(),
        );
    }

    recalc(order);
    order.status = OrderStatus::Paid;
    let fiscal = format!("PRA-{}", Uuid::new_v4().simple());
    order.fiscal_invoice_number = Some(fiscal.clone());
    order.fiscal_qr_text = Some(format!("{fiscal}|{}", order.total));
    order.fiscal_verification_url = Some(format!("https://pra.example/verify/{fiscal}"));
    Json(order.clone()).into_response()
}

async fn cancel(State(state): State<SharedState>, Path(id): Path<String>, uri: Uri) -> Response {
    let mut guard = lock(&state);
    guard.hits.cancel += 1;
    let Some(order) = guard.orders.get_mut(&id) else {
        return error_response(StatusCode::NOT_FOUND, "Order not found", uri.path());
    };
    if let Err(response) = guard_draft(order, uri.path()) {
        return response;
    }
    order.status = OrderStatus::Cancelled;
    Json(order.clone()).into_response()
}

#[derive(Deserialize)]
struct DailySalesQuery {
    date: String,
}

async fn daily_sales(
    State(state): State<SharedState>,
    Query(query): Query<DailySalesQuery>,
) -> Json<DailySalesReport> {
    let mut guard = lock(&state);
    guard.hits.daily_sales += 1;
    let paid: Vec<&Order> = guard
        .orders
        .values()
        .filter(|order| order.status == OrderStatus::Paid)
        .collect();
    let total_sales = paid
        .iter()
        .fold(Decimal::ZERO, |acc, order| {
            acc + Decimal::from_f64(order.total).unwrap_or_default()
        });
    Json(DailySalesReport {
        date: query.date,
        order_count: paid.len() as u64,
        total_sales: round2(total_sales),
    })
}
