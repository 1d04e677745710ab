//! Session cart and checkout route handlers.
//!
//! The cart lives in the session (dish id + quantity); prices are always
//! re-read from the database when the page renders or the order is
//! placed, so a stale cart can never fix a price.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use homeplate_core::{DishId, Price};

use crate::db::{DishRepository, PaymentRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, session_keys};
use crate::services::orders::OrderService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub dish_id: i64,
    pub quantity: u32,
}

/// Remove-from-cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub dish_id: i64,
}

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub delivery_address: String,
    pub note: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// A cart line joined with its dish, for display.
pub struct CartLineView {
    pub dish_id: i64,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub logged_in: bool,
}

/// Checkout payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub order_id: i64,
    pub total: String,
    pub amount_paise: i64,
    pub gateway_order_id: String,
    pub key_id: String,
    pub customer_name: String,
    pub customer_email: String,
}

// =============================================================================
// Session cart helpers
// =============================================================================

async fn read_cart(session: &Session) -> Vec<CartLine> {
    session
        .get::<Vec<CartLine>>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

async fn write_cart(session: &Session, cart: &[CartLine]) -> Result<(), AppError> {
    session
        .insert(session_keys::CART, cart)
        .await
        .map_err(|e| AppError::Internal(format!("session write failed: {e}")))
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
pub async fn show(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let cart = read_cart(&session).await;
    let repo = DishRepository::new(state.pool());

    let mut lines = Vec::with_capacity(cart.len());
    let mut total = Price::ZERO;

    for line in &cart {
        // Dishes pulled since the cart was filled are skipped silently;
        // the order service re-validates at checkout anyway.
        let Some(dish) = repo.get_by_id(line.dish_id).await? else {
            continue;
        };
        let line_total = dish.price.times(line.quantity);
        total = total.plus(line_total);
        lines.push(CartLineView {
            dish_id: dish.id.as_i64(),
            name: dish.name,
            unit_price: dish.price.to_string(),
            quantity: line.quantity,
            line_total: line_total.to_string(),
        });
    }

    let logged_in = session
        .get::<crate::models::CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .is_some();

    Ok(CartTemplate {
        lines,
        total: total.to_string(),
        logged_in,
    })
}

/// Add a dish to the session cart.
pub async fn add(
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    if form.quantity == 0 || form.quantity > 50 {
        return Err(AppError::BadRequest("invalid quantity".to_owned()));
    }

    let dish_id = DishId::new(form.dish_id);
    let mut cart = read_cart(&session).await;

    match cart.iter_mut().find(|l| l.dish_id == dish_id) {
        Some(line) => line.quantity = (line.quantity + form.quantity).min(50),
        None => cart.push(CartLine {
            dish_id,
            quantity: form.quantity,
        }),
    }

    write_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// Remove a dish from the session cart.
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let dish_id = DishId::new(form.dish_id);
    let mut cart = read_cart(&session).await;
    cart.retain(|l| l.dish_id != dish_id);

    write_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart").into_response())
}

/// GET /checkout has nothing of its own to show; the cart page hosts the
/// checkout form.
pub async fn checkout_page() -> Redirect {
    Redirect::to("/cart")
}

/// Checkout: create the order and the gateway order, render the payment
/// page.
///
/// The order is written in `PendingPayment` first, then the gateway order
/// is created for the same amount. If the gateway call fails the order
/// simply stays pending with no payment row and the student can retry
/// from their order history.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response, AppError> {
    let delivery_address = form.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(AppError::BadRequest("delivery address is required".to_owned()));
    }

    let cart = read_cart(&session).await;

    let order = OrderService::new(state.pool())
        .place(user.id, &cart, delivery_address, form.note.as_deref())
        .await?;

    let gateway_order = state
        .razorpay()
        .create_order(order.total.as_paise(), format!("hp-order-{}", order.id))
        .await?;

    PaymentRepository::new(state.pool())
        .create(order.id, &gateway_order.id, gateway_order.amount)
        .await?;

    // Cart is spent; a refresh of the payment page must not double-order.
    write_cart(&session, &[]).await?;

    Ok(CheckoutTemplate {
        order_id: order.id.as_i64(),
        total: order.total.to_string(),
        amount_paise: order.total.as_paise(),
        gateway_order_id: gateway_order.id,
        key_id: state.razorpay().key_id().to_owned(),
        customer_name: user.name,
        customer_email: user.email.to_string(),
    }
    .into_response())
}
