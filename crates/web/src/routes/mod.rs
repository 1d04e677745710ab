//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Shared landing page (role redirector)
//! GET  /unauthorized            - Shown when a role requirement fails
//! GET  /health                  - Health check
//!
//! # Catalog (public)
//! GET  /browse                  - Dish listing
//! GET  /dishes/{id}             - Dish detail
//!
//! # Cart & checkout (checkout requires auth)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add a dish to the session cart
//! POST /cart/remove             - Remove a dish from the session cart
//! POST /checkout                - Create order + gateway order, render payment page
//!
//! # Payments
//! POST /payments/callback       - Signed checkout callback
//! POST /payments/webhook        - Signed gateway webhook
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! POST /auth/logout             - Logout action
//!
//! # Orders (requires auth)
//! GET  /orders                  - Order history
//! GET  /orders/{id}             - Order detail
//! POST /orders/{id}/cancel      - Cancel before the cook accepts
//!
//! # Cook surface (requires cook role; /cook/apply only requires auth)
//! GET  /cook/apply              - Cook application form
//! POST /cook/apply              - Submit application
//! GET  /cook/dashboard          - Incoming orders
//! GET  /cook/dishes             - Manage dishes
//! GET  /cook/dishes/new         - New dish form
//! POST /cook/dishes             - Create dish
//! GET  /cook/dishes/{id}/edit   - Edit dish form
//! POST /cook/dishes/{id}        - Update dish
//! POST /cook/dishes/{id}/delete - Delete dish
//! POST /cook/orders/{id}/status - Apply a workflow action
//!
//! # Admin surface (requires admin role)
//! GET  /admin/dashboard         - Counts and revenue
//! GET  /admin/cooks             - Cook approval queue
//! POST /admin/cooks/{id}/approve
//! POST /admin/cooks/{id}/suspend
//! GET  /admin/orders            - All orders
//! GET  /admin/members           - Admin membership
//! POST /admin/members           - Grant by email
//! POST /admin/members/{user_id}/revoke
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod cook;
pub mod dishes;
pub mod home;
pub mod orders;
pub mod payments;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the catalog routes router.
pub fn dish_routes() -> Router<AppState> {
    Router::new().route("/{id}", get(dishes::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/cancel", post(orders::cancel))
        .route("/{id}/pay", post(orders::pay))
}

/// Create the cook surface router.
pub fn cook_routes() -> Router<AppState> {
    Router::new()
        .route("/apply", get(cook::apply_page).post(cook::apply))
        .route("/dashboard", get(cook::dashboard))
        .route("/dishes", get(cook::dishes).post(cook::create_dish))
        .route("/dishes/new", get(cook::new_dish))
        .route("/dishes/{id}/edit", get(cook::edit_dish))
        .route("/dishes/{id}", post(cook::update_dish))
        .route("/dishes/{id}/delete", post(cook::delete_dish))
        .route("/orders/{id}/status", post(cook::order_status))
}

/// Create the admin surface router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/cooks", get(admin::cooks))
        .route("/cooks/{id}/approve", post(admin::approve_cook))
        .route("/cooks/{id}/suspend", post(admin::suspend_cook))
        .route("/orders", get(admin::orders))
        .route("/members", get(admin::members).post(admin::grant_member))
        .route("/members/{user_id}/revoke", post(admin::revoke_member))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/callback", post(payments::callback))
        .route("/webhook", post(payments::webhook))
}

/// Create all routes for the application.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Shared landing page
        .route("/", get(home::home))
        .route("/unauthorized", get(home::unauthorized))
        // Catalog
        .route("/browse", get(dishes::browse))
        .nest("/dishes", dish_routes())
        // Cart & checkout
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout_page).post(cart::checkout))
        // Orders
        .nest("/orders", order_routes())
        // Cook and admin surfaces
        .nest("/cook", cook_routes())
        .nest("/admin", admin_routes())
        // Payments
        .nest("/payments", payment_routes())
        // Auth, behind its own strict rate limit
        .nest(
            "/auth",
            auth_routes().layer(crate::middleware::auth_rate_limiter()),
        )
}
