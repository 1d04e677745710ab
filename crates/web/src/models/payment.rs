//! Payment domain types.

use chrono::{DateTime, Utc};

use homeplate_core::{OrderId, PaymentId, PaymentStatus};

/// A payment record, one per order (domain type).
///
/// Tracks the gateway's view of the money. The order's own status only
/// advances to `Placed` once this row is `Captured` - that is the
/// reconciliation invariant.
#[derive(Debug, Clone)]
pub struct Payment {
    /// Unique payment ID.
    pub id: PaymentId,
    /// The order this payment settles.
    pub order_id: OrderId,
    /// Gateway order id (e.g., `order_Nxq7...`).
    pub gateway_order_id: String,
    /// Gateway payment id, present once checkout completed.
    pub gateway_payment_id: Option<String>,
    /// Amount in paise, as sent to the gateway.
    pub amount_paise: i64,
    /// Settlement status.
    pub status: PaymentStatus,
    /// When the payment record was created.
    pub created_at: DateTime<Utc>,
    /// When the payment record was last updated.
    pub updated_at: DateTime<Utc>,
}
