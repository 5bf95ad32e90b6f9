//! Catalog Item Model

use serde::{Deserialize, Serialize};

/// Catalog item entity
///
/// Items are soft-deleted only: `is_active = false` hides an item from
/// the POS screen while keeping it listed (and togglable) in the admin
/// screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Free-text category; the category list is derived from loaded items
    pub category: String,
    /// Price in currency unit
    pub price: f64,
    /// Merchant SKU
    pub item_code: String,
    /// Fiscal tariff code, always 8 characters
    pub pct_code: String,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create/update item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    pub price: f64,
    pub category: String,
    pub item_code: String,
    pub pct_code: String,
}
