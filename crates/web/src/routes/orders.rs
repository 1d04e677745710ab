//! Customer order route handlers.
//!
//! All handlers require authentication and scope reads to the logged-in
//! user; there is no way to address another student's order from here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use homeplate_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, PaymentRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::routes::cart::CheckoutTemplate;
use crate::state::AppState;

/// Order summary display data.
pub struct OrderView {
    pub id: i64,
    pub status: String,
    pub total: String,
    pub placed_on: String,
    pub cancellable: bool,
    pub payable: bool,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            status: order.status.to_string(),
            total: order.total.to_string(),
            placed_on: order.created_at.format("%d %b %Y, %H:%M").to_string(),
            cancellable: order.status.cancellable_by_student(),
            payable: order.status == OrderStatus::PendingPayment,
        }
    }
}

/// Order line display data.
pub struct OrderItemView {
    pub dish_name: String,
    pub quantity: i32,
    pub unit_price: String,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderView>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderView,
    pub items: Vec<OrderItemView>,
    pub delivery_address: String,
    pub note: Option<String>,
}

/// Display the logged-in student's order history.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool())
        .list_by_user(user.id)
        .await?;

    Ok(OrdersIndexTemplate {
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Display one order, owner-scoped.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let items = order
        .items
        .iter()
        .map(|item| OrderItemView {
            dish_name: item.dish_name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        })
        .collect();

    Ok(OrderShowTemplate {
        order: OrderView::from(&order),
        items,
        delivery_address: order.delivery_address.clone(),
        note: order.note.clone(),
    })
}

/// Retry payment for an order still awaiting it.
///
/// Reuses the existing gateway order when one is live (a gateway order
/// survives failed attempts); creates one only if checkout never got that
/// far. Renders the same payment page as checkout.
pub async fn pay(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let order = OrderRepository::new(state.pool())
        .get_by_id(OrderId::new(id))
        .await?
        .filter(|o| o.user_id == user.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if order.status != OrderStatus::PendingPayment {
        return Err(AppError::BadRequest(
            "this order is not awaiting payment".to_owned(),
        ));
    }

    let payments = PaymentRepository::new(state.pool());

    let gateway_order_id = match payments.get_by_order_id(order.id).await? {
        Some(payment) if !payment.status.is_settled() => payment.gateway_order_id,
        Some(_) => {
            return Err(AppError::BadRequest(
                "this order's payment is already settled".to_owned(),
            ));
        }
        None => {
            let gateway_order = state
                .razorpay()
                .create_order(order.total.as_paise(), format!("hp-order-{}", order.id))
                .await?;
            payments
                .create(order.id, &gateway_order.id, gateway_order.amount)
                .await?;
            gateway_order.id
        }
    };

    Ok(CheckoutTemplate {
        order_id: order.id.as_i64(),
        total: order.total.to_string(),
        amount_paise: order.total.as_paise(),
        gateway_order_id,
        key_id: state.razorpay().key_id().to_owned(),
        customer_name: user.name,
        customer_email: user.email.to_string(),
    }
    .into_response())
}

/// Cancel an order (student, before the cook accepts).
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    crate::services::orders::OrderService::new(state.pool())
        .cancel_by_student(OrderId::new(id), user.id)
        .await?;

    Ok(Redirect::to("/orders").into_response())
}
