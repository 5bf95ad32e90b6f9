//! Draft order state machine
//!
//! Owns the single in-memory order snapshot. Every mutating operation
//! holds the session lock across its round trip, which gives two
//! guarantees at once: `ensure_order` issues at most one creation
//! request no matter how many callers race it, and mutating calls for
//! the order are serialized so a remove can never overtake an add and
//! get lost in an out-of-order response.
//!
//! The service recomputes subtotal/tax/total on every mutation and
//! returns the full order; the client adopts that response wholesale
//! and never recomputes persisted totals itself.

use crate::{ClientError, ClientResult, PosApi};
use shared::models::{Item, Order, OrderLineUpsert, OrderUpdate};
use tokio::sync::Mutex;

/// Client-side order session
///
/// States: no order yet, DRAFT (mutable), PAID / CANCELLED (terminal,
/// read-only). Transitions out of DRAFT are one-way; mutations against
/// a terminal order are rejected locally before any request is sent,
/// independent of the service enforcing the same rule.
#[derive(Debug)]
pub struct OrderSession {
    api: PosApi,
    current: Mutex<Option<Order>>,
}

impl OrderSession {
    pub fn new(api: PosApi) -> Self {
        Self {
            api,
            current: Mutex::new(None),
        }
    }

    pub fn api(&self) -> &PosApi {
        &self.api
    }

    /// Clone of the current order snapshot, if any
    pub async fn snapshot(&self) -> Option<Order> {
        self.current.lock().await.clone()
    }

    /// Whether a call is in flight; UIs disable their controls on this
    pub fn is_busy(&self) -> bool {
        self.current.try_lock().is_err()
    }

    /// Return the current order, creating an empty DRAFT one if none
    /// exists. Idempotent, and safe to race against itself: concurrent
    /// callers serialize on the session lock, so at most one creation
    /// request goes out.
    pub async fn ensure_order(&self) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        if let Some(order) = current.as_ref() {
            return Ok(order.clone());
        }
        let created = self.api.create_order().await?;
        tracing::debug!(order_id = %created.id, "started new invoice");
        *current = Some(created.clone());
        Ok(created)
    }

    /// Unconditionally start a fresh invoice, replacing any current one
    pub async fn new_invoice(&self) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        let created = self.api.create_order().await?;
        tracing::debug!(order_id = %created.id, "replaced session with new invoice");
        *current = Some(created.clone());
        Ok(created)
    }

    /// Add a catalog item to the order: bump the existing line's
    /// quantity by one, or start a line at quantity one. Creates the
    /// order first if none exists.
    pub async fn add_item(&self, item: &Item) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        let order = match current.as_ref() {
            Some(order) => {
                require_draft(order)?;
                order.clone()
            }
            None => {
                let created = self.api.create_order().await?;
                *current = Some(created.clone());
                created
            }
        };

        let quantity = order.line_for(&item.id).map(|line| line.quantity + 1).unwrap_or(1);
        let line = OrderLineUpsert {
            item_id: item.id.clone(),
            quantity,
        };
        let updated = self.api.upsert_order_line(&order.id, &line).await?;
        tracing::debug!(order_id = %updated.id, item_id = %item.id, quantity, "line upserted");
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Set a line to an exact quantity. Quantities below one are
    /// rejected locally; setting the same value again still round-trips
    /// for a refreshed total.
    pub async fn set_quantity(&self, item_id: &str, quantity: i32) -> ClientResult<Order> {
        if quantity < 1 {
            return Err(ClientError::Validation("Quantity must be at least 1".to_string()));
        }
        let mut current = self.current.lock().await;
        let order = require_order(&current)?;
        require_draft(order)?;

        let line = OrderLineUpsert {
            item_id: item_id.to_string(),
            quantity,
        };
        let updated = self.api.upsert_order_line(&order.id, &line).await?;
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Remove a line by catalog item id. A line that is already gone is
    /// not an error: locally absent lines skip the request entirely,
    /// and a not-found from the service re-reads the order instead of
    /// failing.
    pub async fn remove_item(&self, item_id: &str) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        let order = require_order(&current)?;
        require_draft(order)?;

        if order.line_for(item_id).is_none() {
            return Ok(order.clone());
        }

        let updated = match self.api.remove_order_line(&order.id, item_id).await {
            Ok(order) => order,
            Err(ClientError::Api { status: 404, .. }) => self.api.get_order(&order.id).await?,
            Err(err) => return Err(err),
        };
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Update customer details, discount and/or payment mode. A
    /// negative discount is rejected locally. Switching payment mode
    /// changes the GST rate the service applies on recomputation.
    pub async fn update_details(&self, update: &OrderUpdate) -> ClientResult<Order> {
        if let Some(discount) = update.discount {
            if !discount.is_finite() || discount < 0.0 {
                return Err(ClientError::Validation("Discount must be 0 or more.".to_string()));
            }
        }
        let mut current = self.current.lock().await;
        let order = require_order(&current)?;
        require_draft(order)?;

        let updated = self.api.update_order(&order.id, update).await?;
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Check out the order. Requires at least one line; on success the
    /// service assigns invoice/fiscal numbers, freezes totals, and the
    /// session becomes read-only.
    pub async fn checkout(&self) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        let order = require_order(&current)?;
        require_draft(order)?;
        if order.items.is_empty() {
            return Err(ClientError::Validation("Cannot checkout an empty order".to_string()));
        }

        let updated = self.api.checkout_order(&order.id).await?;
        tracing::debug!(order_id = %updated.id, status = %updated.status, "checkout completed");
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Cancel the order. Allowed only while DRAFT.
    pub async fn cancel(&self) -> ClientResult<Order> {
        let mut current = self.current.lock().await;
        let order = require_order(&current)?;
        require_draft(order)?;

        let updated = self.api.cancel_order(&order.id).await?;
        tracing::debug!(order_id = %updated.id, "order cancelled");
        *current = Some(updated.clone());
        Ok(updated)
    }

    /// Re-read the current order from the service. Allowed in any
    /// state; terminal orders may still be refreshed for display.
    pub async fn refresh(&self) -> ClientResult<Option<Order>> {
        let mut current = self.current.lock().await;
        let Some(order) = current.as_ref() else {
            return Ok(None);
        };
        let fresh = self.api.get_order(&order.id).await?;
        *current = Some(fresh.clone());
        Ok(Some(fresh))
    }

    /// Drop the current order from the session (navigation away)
    pub async fn clear(&self) {
        *self.current.lock().await = None;
    }
}

fn require_order(current: &Option<Order>) -> ClientResult<&Order> {
    current
        .as_ref()
        .ok_or_else(|| ClientError::Validation("No invoice in progress".to_string()))
}

fn require_draft(order: &Order) -> ClientResult<()> {
    if order.status.is_terminal() {
        return Err(ClientError::Closed { status: order.status });
    }
    Ok(())
}
