//! Domain model types.
//!
//! These are validated domain objects, separate from database row types
//! (which live next to their queries in [`crate::db`]) and from template
//! view structs (which live next to their handlers in [`crate::routes`]).

pub mod cook;
pub mod dish;
pub mod order;
pub mod payment;
pub mod session;
pub mod user;

pub use cook::CookProfile;
pub use dish::Dish;
pub use order::{Order, OrderItem};
pub use payment::Payment;
pub use session::{CartLine, CurrentUser, keys as session_keys};
pub use user::User;
