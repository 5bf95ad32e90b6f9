//! Pre-order totals preview
//!
//! The only place the client does tax arithmetic. Used while no order
//! exists yet, purely for display; the moment the service returns an
//! order, its subtotal/tax/total are authoritative and nothing in this
//! crate recomputes them.

use rust_decimal::prelude::*;
use shared::models::PaymentMode;

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// GST rate by payment mode: 16% cash, 5% card.
///
/// The service applies the same rates; this copy exists only for the
/// pre-order preview and must not be used once an order carries a
/// server-supplied `gst_rate`.
pub fn gst_rate(mode: PaymentMode) -> f64 {
    match mode {
        PaymentMode::Cash => 0.16,
        PaymentMode::Card => 0.05,
    }
}

/// Advisory totals shown before any order exists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub gst_rate: f64,
    pub gst_amount: f64,
    pub total: f64,
}

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for display, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Compute the advisory pre-order totals.
///
/// taxable = max(0, subtotal - discount); tax and total are rounded
/// half-up to 2 decimal places, the same arithmetic the service runs.
pub fn preview_totals(subtotal: f64, discount: f64, mode: PaymentMode) -> PreviewTotals {
    let subtotal_dec = to_decimal(subtotal);
    let discount_dec = to_decimal(discount).max(Decimal::ZERO);
    let taxable = (subtotal_dec - discount_dec).max(Decimal::ZERO);
    let rate = to_decimal(gst_rate(mode));
    let gst = (taxable * rate).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = taxable + gst;

    PreviewTotals {
        subtotal: to_f64(subtotal_dec),
        discount: to_f64(discount_dec),
        gst_rate: gst_rate(mode),
        gst_amount: to_f64(gst),
        total: to_f64(total),
    }
}
