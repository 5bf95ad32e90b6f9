//! Daily Sales Report Model

use serde::{Deserialize, Serialize};

/// One calendar day of PAID sales
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesReport {
    /// ISO date (YYYY-MM-DD)
    pub date: String,
    pub order_count: u64,
    /// Sum of order totals in currency unit
    pub total_sales: f64,
}
