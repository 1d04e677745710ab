//! Order domain types.

use chrono::{DateTime, Utc};

use homeplate_core::{CookId, DishId, OrderId, OrderItemId, OrderStatus, Price, UserId};

/// An order placed by a student with a single cook (domain type).
///
/// Line prices are captured at order time; later dish edits do not
/// rewrite history.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The student who placed the order.
    pub user_id: UserId,
    /// The cook fulfilling the order.
    pub cook_id: CookId,
    /// Current workflow status.
    pub status: OrderStatus,
    /// Order total in rupees.
    pub total: Price,
    /// Where to deliver (hostel/room as free text).
    pub delivery_address: String,
    /// Optional note to the cook.
    pub note: Option<String>,
    /// Line items.
    pub items: Vec<OrderItem>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single line of an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique order item ID.
    pub id: OrderItemId,
    /// The order this line belongs to.
    pub order_id: OrderId,
    /// The dish ordered.
    pub dish_id: DishId,
    /// Dish name at order time.
    pub dish_name: String,
    /// Unit price at order time.
    pub unit_price: Price,
    /// Portions ordered.
    pub quantity: i32,
}

impl Order {
    /// Sum of line totals.
    ///
    /// Stored `total` is authoritative (it is what the payment captured);
    /// this exists for consistency checks.
    #[must_use]
    pub fn computed_total(&self) -> Price {
        self.items
            .iter()
            .fold(Price::ZERO, |acc, item| {
                acc.plus(item.unit_price.times(item.quantity.unsigned_abs()))
            })
    }
}
