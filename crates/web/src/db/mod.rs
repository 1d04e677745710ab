//! Database operations for `PostgreSQL`.
//!
//! ## Tables
//!
//! - `app_user` / `user_password` - Accounts and argon2 hashes
//! - `sessions` - Tower-sessions storage
//! - `admin_member` - The admin-membership set (presence = admin)
//! - `cook_profile` - Cook profiles (existence = cook role)
//! - `dish` - Dishes offered by cooks
//! - `app_order` / `order_item` - Orders and captured line prices
//! - `payment` - Gateway payment records, one per order
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p hp-cli -- migrate
//! ```
//! They are never run automatically on startup.

pub mod admins;
pub mod cooks;
pub mod dishes;
pub mod orders;
pub mod payments;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admins::AdminMemberRepository;
pub use cooks::CookRepository;
pub use dishes::DishRepository;
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
