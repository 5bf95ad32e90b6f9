//! Data models

pub mod item;
pub mod order;
pub mod report;

pub use item::{Item, ItemPayload};
pub use order::{Order, OrderItem, OrderLineUpsert, OrderStatus, OrderUpdate, PaymentMode};
pub use report::DailySalesReport;
