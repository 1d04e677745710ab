//! Business logic services.
//!
//! Services own decisions; repositories own SQL; routes own HTTP. The
//! role resolver lives here too since it is business logic, even though
//! its consumers are mostly the guard extractors.

pub mod auth;
pub mod orders;
pub mod roles;

pub use auth::{AuthError, AuthService};
pub use orders::{CookAction, OrderError, OrderService, SettlementOutcome};
pub use roles::{PgRoleSources, Resolution, RoleResolver, RoleSources};
