//! Status enums and the order-status workflow.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// The workflow is a straight line with two exits:
///
/// ```text
/// PendingPayment -> Placed -> Accepted -> Preparing -> Ready -> Delivered
///                     |           ^
///                     v           |
///                  Rejected    Cancelled (student, before Accepted)
/// ```
///
/// Every write goes through [`OrderStatus::can_transition_to`]; there are no
/// free-form status updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, gateway payment not yet captured.
    #[default]
    PendingPayment,
    /// Payment captured; waiting for the cook to accept.
    Placed,
    /// Cook accepted the order.
    Accepted,
    /// Cook is preparing the food.
    Preparing,
    /// Food is ready for pickup/delivery.
    Ready,
    /// Order handed over. Terminal.
    Delivered,
    /// Student cancelled before the cook accepted. Terminal.
    Cancelled,
    /// Cook declined the order. Terminal.
    Rejected,
}

impl OrderStatus {
    /// Whether this status permits a transition to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::PendingPayment, Self::Placed | Self::Cancelled)
                | (Self::Placed, Self::Accepted | Self::Rejected | Self::Cancelled)
                | (Self::Accepted, Self::Preparing)
                | (Self::Preparing, Self::Ready)
                | (Self::Ready, Self::Delivered)
        )
    }

    /// Whether the workflow ends here.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Rejected)
    }

    /// Whether the student may still cancel.
    #[must_use]
    pub const fn cancellable_by_student(self) -> bool {
        self.can_transition_to(Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PendingPayment => "pending_payment",
            Self::Placed => "placed",
            Self::Accepted => "accepted",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// Cook profile status.
///
/// Gates selling, not role resolution: a pending cook already resolves to
/// the cook role but cannot publish dishes or accept orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "cook_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum CookStatus {
    /// Applied, awaiting admin approval.
    #[default]
    Pending,
    /// Approved by an admin; may sell.
    Approved,
    /// Suspended by an admin; may not sell.
    Suspended,
}

impl std::fmt::Display for CookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Suspended => write!(f, "suspended"),
        }
    }
}

/// Payment record status, mirroring the gateway's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "payment_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Gateway order created, awaiting checkout.
    #[default]
    Created,
    /// Signature verified and amount captured.
    Captured,
    /// Checkout failed or signature rejected.
    Failed,
    /// Captured amount returned. Terminal.
    Refunded,
}

impl PaymentStatus {
    /// Whether a settlement event may still change this payment.
    ///
    /// `Captured` is sticky: a late `payment.failed` webhook after a
    /// successful capture must not regress the record.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Captured | Self::Refunded)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Captured => write!(f, "captured"),
            Self::Failed => write!(f, "failed"),
            Self::Refunded => write!(f, "refunded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ORDER_STATUSES: [OrderStatus; 8] = [
        OrderStatus::PendingPayment,
        OrderStatus::Placed,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Rejected,
    ];

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            OrderStatus::PendingPayment,
            OrderStatus::Placed,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ];
        for pair in path.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL_ORDER_STATUSES {
            if from.is_terminal() {
                for to in ALL_ORDER_STATUSES {
                    assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
                }
            }
        }
    }

    #[test]
    fn test_no_skipping_preparation() {
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Accepted.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::PendingPayment.can_transition_to(OrderStatus::Accepted));
    }

    #[test]
    fn test_cancellation_window_closes_at_accepted() {
        assert!(OrderStatus::PendingPayment.cancellable_by_student());
        assert!(OrderStatus::Placed.cancellable_by_student());
        assert!(!OrderStatus::Accepted.cancellable_by_student());
        assert!(!OrderStatus::Ready.cancellable_by_student());
    }

    #[test]
    fn test_rejection_only_from_placed() {
        for from in ALL_ORDER_STATUSES {
            let legal = from == OrderStatus::Placed;
            assert_eq!(from.can_transition_to(OrderStatus::Rejected), legal);
        }
    }

    #[test]
    fn test_captured_payment_is_settled() {
        assert!(PaymentStatus::Captured.is_settled());
        assert!(PaymentStatus::Refunded.is_settled());
        assert!(!PaymentStatus::Created.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
    }
}
