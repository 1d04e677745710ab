//! User domain types.

use chrono::{DateTime, Utc};

use homeplate_core::{Email, UserId};

/// A registered user (domain type).
///
/// Every account starts as a plain student customer; cook and admin
/// standing are separate facts resolved per request, never stored here.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
    /// Display name shown on orders and dishes.
    pub name: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
