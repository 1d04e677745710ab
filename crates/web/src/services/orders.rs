//! Order placement and the status workflow.
//!
//! All status writes funnel through [`OrderService`], which validates every
//! move against the transition table in `homeplate_core::OrderStatus`. The
//! repositories will happily write anything; this layer is what makes
//! illegal transitions unrepresentable in practice.

use sqlx::PgPool;
use thiserror::Error;

use homeplate_core::{CookId, DishId, OrderId, OrderStatus, PaymentStatus, Price, UserId};

use crate::db::orders::NewOrderItem;
use crate::db::{
    CookRepository, DishRepository, OrderRepository, PaymentRepository, RepositoryError,
};
use crate::models::{CartLine, Dish, Order};

/// Errors from order placement and workflow operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart was empty at checkout.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a dish that no longer exists or is unavailable.
    #[error("dish {0} is not available")]
    DishUnavailable(DishId),

    /// Cart lines span more than one cook.
    #[error("an order can only contain dishes from one cook")]
    MultipleCooks,

    /// The dish's cook is not approved to sell.
    #[error("this cook is not currently taking orders")]
    CookNotSelling,

    /// A quantity was zero or absurd.
    #[error("invalid quantity")]
    InvalidQuantity,

    /// The order doesn't exist or belongs to someone else.
    #[error("order not found")]
    NotFound,

    /// The requested status change is not in the transition table.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A workflow action a cook can apply to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookAction {
    Accept,
    Reject,
    Preparing,
    Ready,
    Delivered,
}

impl CookAction {
    /// Parse the action name posted by the dashboard form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            "preparing" => Some(Self::Preparing),
            "ready" => Some(Self::Ready),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    /// The status this action moves an order to.
    #[must_use]
    pub const fn target(self) -> OrderStatus {
        match self {
            Self::Accept => OrderStatus::Accepted,
            Self::Reject => OrderStatus::Rejected,
            Self::Preparing => OrderStatus::Preparing,
            Self::Ready => OrderStatus::Ready,
            Self::Delivered => OrderStatus::Delivered,
        }
    }
}

/// Validated order lines, ready to write.
#[derive(Debug)]
pub struct PreparedOrder {
    pub cook_id: CookId,
    pub total: Price,
    pub items: Vec<NewOrderItem>,
}

/// Build order lines from the session cart and the dishes it references.
///
/// Pure validation: quantities positive, every dish present and available,
/// all dishes from one cook. Unit prices are captured here, so later dish
/// edits never change what the student agreed to pay.
///
/// # Errors
///
/// Returns an `OrderError` describing the first violated rule.
pub fn prepare_order(cart: &[CartLine], dishes: &[Dish]) -> Result<PreparedOrder, OrderError> {
    if cart.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    let mut cook_id: Option<CookId> = None;
    let mut total = Price::ZERO;
    let mut items = Vec::with_capacity(cart.len());

    for line in cart {
        if line.quantity == 0 || line.quantity > 50 {
            return Err(OrderError::InvalidQuantity);
        }

        let dish = dishes
            .iter()
            .find(|d| d.id == line.dish_id)
            .filter(|d| d.available)
            .ok_or(OrderError::DishUnavailable(line.dish_id))?;

        match cook_id {
            None => cook_id = Some(dish.cook_id),
            Some(existing) if existing != dish.cook_id => {
                return Err(OrderError::MultipleCooks);
            }
            Some(_) => {}
        }

        total = total.plus(dish.price.times(line.quantity));
        items.push(NewOrderItem {
            dish_id: dish.id,
            dish_name: dish.name.clone(),
            unit_price: dish.price,
            quantity: i32::try_from(line.quantity).map_err(|_| OrderError::InvalidQuantity)?,
        });
    }

    let cook_id = cook_id.ok_or(OrderError::EmptyCart)?;

    Ok(PreparedOrder {
        cook_id,
        total,
        items,
    })
}

/// Order placement and workflow service.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order from the session cart.
    ///
    /// Fetches the referenced dishes, validates via [`prepare_order`],
    /// checks the cook is approved, and writes the order in
    /// `PendingPayment`. Payment creation happens in the checkout route
    /// once the gateway order exists.
    ///
    /// # Errors
    ///
    /// Returns an `OrderError` if validation or any write fails.
    pub async fn place(
        &self,
        user_id: UserId,
        cart: &[CartLine],
        delivery_address: &str,
        note: Option<&str>,
    ) -> Result<Order, OrderError> {
        let dish_repo = DishRepository::new(self.pool);
        let mut dishes = Vec::with_capacity(cart.len());
        for line in cart {
            if let Some(dish) = dish_repo.get_by_id(line.dish_id).await? {
                dishes.push(dish);
            }
        }

        let prepared = prepare_order(cart, &dishes)?;

        let cook = CookRepository::new(self.pool)
            .get_by_id(prepared.cook_id)
            .await?
            .ok_or(OrderError::CookNotSelling)?;
        if !cook.can_sell() {
            return Err(OrderError::CookNotSelling);
        }

        let order = OrderRepository::new(self.pool)
            .create(
                user_id,
                prepared.cook_id,
                prepared.total,
                delivery_address,
                note,
                &prepared.items,
            )
            .await?;

        tracing::info!(order_id = %order.id, %user_id, cook_id = %prepared.cook_id,
            total = %order.total, "order created, awaiting payment");

        Ok(order)
    }

    /// Apply a cook's workflow action to an order they own.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist or belongs
    /// to another cook, `OrderError::InvalidTransition` if the move is not
    /// in the transition table.
    pub async fn apply_cook_action(
        &self,
        order_id: OrderId,
        cook_id: CookId,
        action: CookAction,
    ) -> Result<(), OrderError> {
        let repo = OrderRepository::new(self.pool);

        let order = repo.get_by_id(order_id).await?.ok_or(OrderError::NotFound)?;
        if order.cook_id != cook_id {
            return Err(OrderError::NotFound);
        }

        let next = action.target();
        if !order.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        repo.transition_status(order_id, order.status, next).await?;

        tracing::info!(%order_id, %cook_id, from = %order.status, to = %next, "order status updated");

        Ok(())
    }

    /// Cancel an order on behalf of the student who placed it.
    ///
    /// Only allowed while the cook hasn't accepted yet.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist or belongs
    /// to another user, `OrderError::InvalidTransition` once the
    /// cancellation window has closed.
    pub async fn cancel_by_student(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<(), OrderError> {
        let repo = OrderRepository::new(self.pool);

        let order = repo.get_by_id(order_id).await?.ok_or(OrderError::NotFound)?;
        if order.user_id != user_id {
            return Err(OrderError::NotFound);
        }

        if !order.status.cancellable_by_student() {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            });
        }

        repo.transition_status(order_id, order.status, OrderStatus::Cancelled)
            .await?;

        tracing::info!(%order_id, %user_id, "order cancelled by student");

        Ok(())
    }

    /// Settle a payment and reconcile its order.
    ///
    /// Idempotent: a payment that is already settled is left untouched and
    /// reported as such. On capture, the order moves `PendingPayment ->
    /// Placed`; the order write is skipped if some earlier settlement
    /// already moved it.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown gateway order id.
    pub async fn settle_payment(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        captured: bool,
    ) -> Result<SettlementOutcome, OrderError> {
        let payments = PaymentRepository::new(self.pool);

        let payment = payments
            .get_by_gateway_order_id(gateway_order_id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if payment.status.is_settled() {
            tracing::debug!(gateway_order_id, status = %payment.status,
                "payment already settled, ignoring duplicate settlement");
            return Ok(SettlementOutcome::AlreadySettled);
        }

        let status = if captured {
            PaymentStatus::Captured
        } else {
            PaymentStatus::Failed
        };

        let updated = payments
            .settle(payment.id, gateway_payment_id, status)
            .await?;
        if !updated {
            // Lost a race with a concurrent settlement.
            return Ok(SettlementOutcome::AlreadySettled);
        }

        if captured {
            // Reconciliation: captured money is what moves the order into
            // the cook's queue. A failed transition here means the order
            // already advanced, which is fine.
            let orders = OrderRepository::new(self.pool);
            match orders
                .transition_status(payment.order_id, OrderStatus::PendingPayment, OrderStatus::Placed)
                .await
            {
                Ok(()) => {}
                Err(RepositoryError::NotFound) => {
                    tracing::warn!(order_id = %payment.order_id,
                        "payment captured but order was not pending payment");
                }
                Err(e) => return Err(e.into()),
            }

            tracing::info!(gateway_order_id, order_id = %payment.order_id, "payment captured, order placed");
            Ok(SettlementOutcome::Captured)
        } else {
            tracing::warn!(gateway_order_id, order_id = %payment.order_id, "payment failed");
            Ok(SettlementOutcome::Failed)
        }
    }
}

/// What a settlement attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Payment captured and order placed.
    Captured,
    /// Payment marked failed.
    Failed,
    /// A previous settlement already decided this payment.
    AlreadySettled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dish(id: i64, cook: i64, price_paise: i64, available: bool) -> Dish {
        Dish {
            id: DishId::new(id),
            cook_id: CookId::new(cook),
            name: format!("dish-{id}"),
            description: String::new(),
            price: Price::from_paise(price_paise),
            serves: 1,
            is_veg: true,
            available,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(dish_id: i64, quantity: u32) -> CartLine {
        CartLine {
            dish_id: DishId::new(dish_id),
            quantity,
        }
    }

    #[test]
    fn test_prepare_order_totals_and_captures_prices() {
        let dishes = vec![dish(1, 10, 9000, true), dish(2, 10, 4500, true)];
        let prepared = prepare_order(&[line(1, 2), line(2, 1)], &dishes).unwrap();

        assert_eq!(prepared.cook_id, CookId::new(10));
        assert_eq!(prepared.total.as_paise(), 22500);
        assert_eq!(prepared.items.len(), 2);
        assert_eq!(prepared.items[0].unit_price.as_paise(), 9000);
    }

    #[test]
    fn test_prepare_order_rejects_empty_cart() {
        assert!(matches!(prepare_order(&[], &[]), Err(OrderError::EmptyCart)));
    }

    #[test]
    fn test_prepare_order_rejects_unavailable_dish() {
        let dishes = vec![dish(1, 10, 9000, false)];
        assert!(matches!(
            prepare_order(&[line(1, 1)], &dishes),
            Err(OrderError::DishUnavailable(_))
        ));
    }

    #[test]
    fn test_prepare_order_rejects_missing_dish() {
        let dishes = vec![dish(1, 10, 9000, true)];
        assert!(matches!(
            prepare_order(&[line(99, 1)], &dishes),
            Err(OrderError::DishUnavailable(_))
        ));
    }

    #[test]
    fn test_prepare_order_rejects_multiple_cooks() {
        let dishes = vec![dish(1, 10, 9000, true), dish(2, 11, 4500, true)];
        assert!(matches!(
            prepare_order(&[line(1, 1), line(2, 1)], &dishes),
            Err(OrderError::MultipleCooks)
        ));
    }

    #[test]
    fn test_prepare_order_rejects_zero_quantity() {
        let dishes = vec![dish(1, 10, 9000, true)];
        assert!(matches!(
            prepare_order(&[line(1, 0)], &dishes),
            Err(OrderError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_cook_action_parsing() {
        assert_eq!(CookAction::parse("accept"), Some(CookAction::Accept));
        assert_eq!(CookAction::parse("delivered"), Some(CookAction::Delivered));
        assert_eq!(CookAction::parse("explode"), None);
    }

    #[test]
    fn test_cook_action_targets_follow_workflow() {
        assert!(OrderStatus::Placed.can_transition_to(CookAction::Accept.target()));
        assert!(OrderStatus::Placed.can_transition_to(CookAction::Reject.target()));
        assert!(OrderStatus::Accepted.can_transition_to(CookAction::Preparing.target()));
        assert!(OrderStatus::Preparing.can_transition_to(CookAction::Ready.target()));
        assert!(OrderStatus::Ready.can_transition_to(CookAction::Delivered.target()));

        // And the ones the table forbids:
        assert!(!OrderStatus::Placed.can_transition_to(CookAction::Ready.target()));
        assert!(!OrderStatus::Delivered.can_transition_to(CookAction::Accept.target()));
    }
}
