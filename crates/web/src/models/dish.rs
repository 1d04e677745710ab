//! Dish domain types.

use chrono::{DateTime, Utc};

use homeplate_core::{CookId, DishId, Price};

/// A dish offered by a cook (domain type).
#[derive(Debug, Clone)]
pub struct Dish {
    /// Unique dish ID.
    pub id: DishId,
    /// The cook offering this dish.
    pub cook_id: CookId,
    /// Dish name.
    pub name: String,
    /// Description shown on the detail page.
    pub description: String,
    /// Price per portion in rupees.
    pub price: Price,
    /// How many people one portion serves.
    pub serves: i32,
    /// Vegetarian flag.
    pub is_veg: bool,
    /// Whether the dish is currently orderable.
    pub available: bool,
    /// When the dish was created.
    pub created_at: DateTime<Utc>,
    /// When the dish was last updated.
    pub updated_at: DateTime<Utc>,
}
