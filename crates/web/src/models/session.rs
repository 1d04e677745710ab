//! Session-related types.
//!
//! Types stored in the session for authentication state. The session is
//! the only place identity lives between requests; role is never stored
//! here - it is recomputed per request by the role resolver.

use serde::{Deserialize, Serialize};

use homeplate_core::{DishId, Email, UserId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// User's display name.
    pub name: String,
}

/// A cart line stored in the session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    /// The dish being ordered.
    pub dish_id: DishId,
    /// How many portions.
    pub quantity: u32,
}

/// Session keys for authentication and cart data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart (a `Vec<CartLine>`).
    pub const CART: &str = "cart";
}
