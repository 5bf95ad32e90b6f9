//! ChefPOS Client - HTTP client and order state machine for the POS service
//!
//! Provides the pieces behind a point-of-sale screen: a typed JSON/HTTP
//! client for the remote order/item service, an in-memory catalog cache
//! with filtering, a draft-order state machine whose totals stay
//! server-authoritative, and a debounced coalescer for customer-detail
//! edits.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod preview;
pub mod session;
pub mod sync;

pub use catalog::{Catalog, CategoryFilter};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::PosApi;
pub use preview::{PreviewTotals, preview_totals};
pub use session::OrderSession;
pub use sync::{DetailForm, DetailSync, SyncState};

// Re-export shared models for convenience
pub use shared::models::{
    DailySalesReport, Item, ItemPayload, Order, OrderItem, OrderLineUpsert, OrderStatus,
    OrderUpdate, PaymentMode,
};
