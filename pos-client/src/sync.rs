//! Debounced detail-sync coalescer
//!
//! Prevents one PATCH per keystroke while customer/payment fields are
//! being edited. Edits re-arm a trailing-edge timer; only the payload
//! standing when the quiet period elapses is sent. A payload identical
//! to the last successfully sent one is suppressed entirely, including
//! the case where the user types and then deletes back to the saved
//! values before the timer fires.

use crate::{ClientError, ClientResult, OrderSession};
use shared::models::{Order, OrderUpdate, PaymentMode};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Sync lifecycle, published for the UI's "Saving… / Saved" indicator
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    /// An edit is waiting out the quiet period
    Pending,
    /// The PATCH is in flight
    Saving,
    Saved,
    /// The save failed; previously saved state is untouched
    Failed(String),
}

/// In-memory edit state of the tracked order fields
///
/// `discount` stays raw text because it mirrors an input field; it is
/// parsed (and validated) when a sync is queued.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_cnic: String,
    pub customer_pntn: String,
    pub customer_tax_id: String,
    pub notes: String,
    pub discount: String,
    pub payment_mode: PaymentMode,
}

impl Default for DetailForm {
    fn default() -> Self {
        Self {
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_cnic: String::new(),
            customer_pntn: String::new(),
            customer_tax_id: String::new(),
            notes: String::new(),
            discount: "0".to_string(),
            payment_mode: PaymentMode::Cash,
        }
    }
}

impl DetailForm {
    /// Seed the form from an order snapshot
    pub fn from_order(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone().unwrap_or_default(),
            customer_phone: order.customer_phone.clone().unwrap_or_default(),
            customer_cnic: order.customer_cnic.clone().unwrap_or_default(),
            customer_pntn: order.customer_pntn.clone().unwrap_or_default(),
            customer_tax_id: order.customer_tax_id.clone().unwrap_or_default(),
            notes: order.notes.clone().unwrap_or_default(),
            discount: order
                .discount
                .map(|d| format!("{d:.2}"))
                .unwrap_or_else(|| "0".to_string()),
            payment_mode: order.payment_mode.unwrap_or_default(),
        }
    }

    /// Build the partial update this form represents.
    ///
    /// Blank fields are omitted (the service leaves omitted fields
    /// untouched). An unparseable or negative discount is a validation
    /// error.
    pub fn to_update(&self) -> ClientResult<OrderUpdate> {
        let discount = self.discount.trim();
        let discount = if discount.is_empty() {
            0.0
        } else {
            discount
                .parse::<f64>()
                .map_err(|_| ClientError::Validation("Discount must be 0 or more.".to_string()))?
        };
        if !discount.is_finite() || discount < 0.0 {
            return Err(ClientError::Validation("Discount must be 0 or more.".to_string()));
        }

        Ok(OrderUpdate {
            customer_name: non_blank(&self.customer_name),
            customer_phone: non_blank(&self.customer_phone),
            customer_cnic: non_blank(&self.customer_cnic),
            customer_pntn: non_blank(&self.customer_pntn),
            customer_tax_id: non_blank(&self.customer_tax_id),
            notes: non_blank(&self.notes),
            discount: Some(discount),
            payment_mode: Some(self.payment_mode),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Debounced writer for order detail edits
///
/// Owns a single cancellable timer task: arming it aborts any previous
/// one, and dropping the coalescer aborts whatever is still pending so
/// a torn-down screen cannot write to a no-longer-current order.
pub struct DetailSync {
    session: Arc<OrderSession>,
    delay: Duration,
    /// Serialized form of the last payload the service accepted
    last_sent: Arc<Mutex<Option<String>>>,
    pending: Mutex<Option<JoinHandle<()>>>,
    state: Arc<watch::Sender<SyncState>>,
}

impl DetailSync {
    pub fn new(session: Arc<OrderSession>, delay: Duration) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            session,
            delay,
            last_sent: Arc::new(Mutex::new(None)),
            pending: Mutex::new(None),
            state: Arc::new(state),
        }
    }

    /// Watch the sync lifecycle
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    /// Current sync state
    pub fn state(&self) -> SyncState {
        self.state.borrow().clone()
    }

    /// Register an edit. Returns whether a write was scheduled: `false`
    /// means the edit was suppressed (identical to the last saved
    /// payload, or the order is not in a syncable state).
    ///
    /// Validation runs before anything is scheduled; a failing edit
    /// blocks the timer and leaves the previously saved baseline alone.
    pub async fn queue(&self, form: &DetailForm) -> ClientResult<bool> {
        // Disabled entirely once the order leaves DRAFT (or before one exists)
        match self.session.snapshot().await {
            Some(order) if order.is_draft() => {}
            _ => {
                self.cancel_pending();
                return Ok(false);
            }
        }

        let update = form.to_update()?;
        let fingerprint = serde_json::to_string(&update)?;

        if self.last_sent.lock().expect("sync baseline mutex poisoned").as_deref()
            == Some(fingerprint.as_str())
        {
            // Edited back to the saved values: drop any write armed for
            // the in-between states
            self.cancel_pending();
            self.state.send_replace(SyncState::Idle);
            return Ok(false);
        }

        self.cancel_pending();

        let session = Arc::clone(&self.session);
        let last_sent = Arc::clone(&self.last_sent);
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_replace(SyncState::Saving);
            match session.update_details(&update).await {
                Ok(order) => {
                    *last_sent.lock().expect("sync baseline mutex poisoned") = Some(fingerprint);
                    tracing::debug!(order_id = %order.id, "order details saved");
                    state.send_replace(SyncState::Saved);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "order detail sync failed");
                    state.send_replace(SyncState::Failed(err.to_string()));
                }
            }
        });

        *self.pending.lock().expect("sync timer mutex poisoned") = Some(handle);
        self.state.send_replace(SyncState::Pending);
        Ok(true)
    }

    /// Abort the armed timer, if any
    pub fn cancel_pending(&self) {
        if let Some(handle) = self.pending.lock().expect("sync timer mutex poisoned").take() {
            handle.abort();
        }
    }

    /// Forget the saved baseline and cancel any pending write. Call
    /// when the session's order is swapped out (new invoice).
    pub fn reset(&self) {
        self.cancel_pending();
        *self.last_sent.lock().expect("sync baseline mutex poisoned") = None;
        self.state.send_replace(SyncState::Idle);
    }
}

impl Drop for DetailSync {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
