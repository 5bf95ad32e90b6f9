//! Shared types for the ChefPOS client
//!
//! Data models and request payloads exchanged with the remote
//! order/item service. Wire format is camelCase JSON with
//! SCREAMING_SNAKE_CASE enums, matching the service.

pub mod models;

// Re-exports
pub use models::{
    DailySalesReport, Item, ItemPayload, Order, OrderItem, OrderLineUpsert, OrderStatus,
    OrderUpdate, PaymentMode,
};
pub use serde::{Deserialize, Serialize};
