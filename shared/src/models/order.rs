//! Order / Invoice Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle status
///
/// DRAFT is the only mutable state. PAID and CANCELLED are terminal:
/// the service rejects further mutation and the client must not even
/// attempt it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Draft,
    Paid,
    Cancelled,
}

impl OrderStatus {
    /// Terminal orders accept no further mutation.
    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Draft)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Payment mode, determines the GST rate the service applies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    #[default]
    Cash,
    Card,
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentMode::Cash => "CASH",
            PaymentMode::Card => "CARD",
        };
        f.write_str(s)
    }
}

/// Order line item
///
/// `item_name` and `unit_price` are snapshots taken when the line was
/// added; later catalog edits do not propagate. `line_total` is
/// computed by the service and taken verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    /// Catalog item reference
    pub item_id: String,
    pub item_name: String,
    pub quantity: i32,
    /// Unit price in currency unit (snapshot at time of add)
    pub unit_price: f64,
    /// Line total in currency unit (service-computed)
    pub line_total: f64,
}

/// Order entity (invoice)
///
/// Subtotal, tax and total are authoritative the moment the order
/// exists; the client only recomputes totals for the pre-order preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub invoice_number: Option<String>,
    /// Assigned by the fiscal authority on successful checkout
    pub fiscal_invoice_number: Option<String>,
    pub fiscal_qr_text: Option<String>,
    pub fiscal_verification_url: Option<String>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_mode: Option<PaymentMode>,
    pub gst_rate: Option<f64>,
    /// Mirrors `tax`; kept separate because the receipt prints it by name
    pub gst_amount: Option<f64>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub customer_cnic: Option<String>,
    pub customer_pntn: Option<String>,
    pub customer_tax_id: Option<String>,
    pub notes: Option<String>,
    pub discount: Option<f64>,
    pub created_at: Option<String>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Returns the line for a catalog item, if present.
    ///
    /// There is at most one line per distinct catalog item; re-adding
    /// an item bumps its quantity instead of creating a second row.
    pub fn line_for(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|line| line.item_id == item_id)
    }

    pub fn is_draft(&self) -> bool {
        self.status == OrderStatus::Draft
    }
}

/// Partial order update payload (customer details, discount, payment mode)
///
/// Absent fields are left untouched by the service, so only the fields
/// being changed need to be set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_cnic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_pntn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_mode: Option<PaymentMode>,
}

/// Line upsert payload
///
/// `quantity` is absolute, not a delta; posting the same item again
/// replaces the line's quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineUpsert {
    pub item_id: String,
    pub quantity: i32,
}
