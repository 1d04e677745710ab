//! Cook surface route handlers.
//!
//! Everything here except the application form requires the cook role;
//! the application form only requires authentication, since submitting it
//! is what makes a student a cook.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;

use homeplate_core::{CookStatus, DishId, OrderId, Price};

use crate::db::dishes::DishInput;
use crate::db::{CookRepository, DishRepository, OrderRepository, RepositoryError};
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAuth, RequireCook};
use crate::models::{CookProfile, Order};
use crate::routes::auth::MessageQuery;
use crate::services::orders::{CookAction, OrderService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Cook application form data.
#[derive(Debug, Deserialize)]
pub struct ApplyForm {
    pub kitchen_name: String,
    pub bio: String,
    pub campus_area: String,
}

/// Dish create/edit form data.
///
/// Checkboxes arrive as `"on"` when ticked and are absent otherwise.
#[derive(Debug, Deserialize)]
pub struct DishForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub serves: i32,
    #[serde(default)]
    pub is_veg: Option<String>,
    #[serde(default)]
    pub available: Option<String>,
}

impl DishForm {
    fn into_input(self) -> Result<DishInput, AppError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::BadRequest("dish name is required".to_owned()));
        }

        let amount: Decimal = self
            .price
            .trim()
            .parse()
            .map_err(|_| AppError::BadRequest("invalid price".to_owned()))?;
        let price = Price::new(amount);
        if !price.is_positive() {
            return Err(AppError::BadRequest("price must be positive".to_owned()));
        }

        if !(1..=20).contains(&self.serves) {
            return Err(AppError::BadRequest("serves must be 1-20".to_owned()));
        }

        Ok(DishInput {
            name,
            description: self.description.trim().to_owned(),
            price,
            serves: self.serves,
            is_veg: self.is_veg.is_some(),
            available: self.available.is_some(),
        })
    }
}

/// Order workflow action form data.
#[derive(Debug, Deserialize)]
pub struct OrderActionForm {
    pub action: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Cook profile display data.
pub struct ProfileView {
    pub kitchen_name: String,
    pub campus_area: String,
    pub status: String,
    pub pending: bool,
    pub suspended: bool,
}

impl From<&CookProfile> for ProfileView {
    fn from(profile: &CookProfile) -> Self {
        Self {
            kitchen_name: profile.kitchen_name.clone(),
            campus_area: profile.campus_area.clone(),
            status: profile.status.to_string(),
            pending: profile.status == CookStatus::Pending,
            suspended: profile.status == CookStatus::Suspended,
        }
    }
}

/// Incoming order display data with the actions its status permits.
pub struct IncomingOrderView {
    pub id: i64,
    pub status: String,
    pub total: String,
    pub delivery_address: String,
    pub note: Option<String>,
    pub summary: String,
    pub placed_on: String,
    pub can_accept: bool,
    pub can_reject: bool,
    pub can_preparing: bool,
    pub can_ready: bool,
    pub can_delivered: bool,
}

impl From<&Order> for IncomingOrderView {
    fn from(order: &Order) -> Self {
        let summary = order
            .items
            .iter()
            .map(|i| format!("{} x{}", i.dish_name, i.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: order.id.as_i64(),
            status: order.status.to_string(),
            total: order.total.to_string(),
            delivery_address: order.delivery_address.clone(),
            note: order.note.clone(),
            summary,
            placed_on: order.created_at.format("%d %b %Y, %H:%M").to_string(),
            can_accept: order.status.can_transition_to(CookAction::Accept.target()),
            can_reject: order.status.can_transition_to(CookAction::Reject.target()),
            can_preparing: order
                .status
                .can_transition_to(CookAction::Preparing.target()),
            can_ready: order.status.can_transition_to(CookAction::Ready.target()),
            can_delivered: order
                .status
                .can_transition_to(CookAction::Delivered.target()),
        }
    }
}

/// Dish row display data for the management page.
pub struct CookDishView {
    pub id: i64,
    pub name: String,
    pub price: String,
    pub serves: i32,
    pub is_veg: bool,
    pub available: bool,
}

// =============================================================================
// Templates
// =============================================================================

/// Cook application page template.
#[derive(Template, WebTemplate)]
#[template(path = "cook/apply.html")]
pub struct ApplyTemplate {
    pub error: Option<String>,
}

/// Cook dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "cook/dashboard.html")]
pub struct DashboardTemplate {
    pub profile: ProfileView,
    pub orders: Vec<IncomingOrderView>,
    pub dish_count: usize,
}

/// Dish management page template.
#[derive(Template, WebTemplate)]
#[template(path = "cook/dishes.html")]
pub struct DishesTemplate {
    pub profile: ProfileView,
    pub dishes: Vec<CookDishView>,
}

/// Dish create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "cook/dish_form.html")]
pub struct DishFormTemplate {
    pub editing: bool,
    pub dish_id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub serves: i32,
    pub is_veg: bool,
    pub available: bool,
}

// =============================================================================
// Helpers
// =============================================================================

async fn profile_for(
    state: &AppState,
    user_id: homeplate_core::UserId,
) -> Result<CookProfile, AppError> {
    CookRepository::new(state.pool())
        .get_by_user_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("cook profile".to_owned()))
}

// =============================================================================
// Application
// =============================================================================

/// Display the cook application form.
pub async fn apply_page(
    RequireAuth(_user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    ApplyTemplate { error: query.error }
}

/// Handle a cook application.
///
/// Creates the pending profile; from the next request on, this user
/// resolves to the cook role and lands on the dashboard.
pub async fn apply(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ApplyForm>,
) -> Result<Response, AppError> {
    let kitchen_name = form.kitchen_name.trim();
    let campus_area = form.campus_area.trim();
    if kitchen_name.is_empty() || campus_area.is_empty() {
        return Ok(Redirect::to("/cook/apply?error=missing_fields").into_response());
    }

    match CookRepository::new(state.pool())
        .create(user.id, kitchen_name, form.bio.trim(), campus_area)
        .await
    {
        Ok(profile) => {
            tracing::info!(user_id = %user.id, cook_id = %profile.id, "cook application submitted");
            Ok(Redirect::to("/cook/dashboard").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/cook/dashboard").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the cook dashboard with incoming orders.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
) -> Result<impl IntoResponse, AppError> {
    let profile = profile_for(&state, user.id).await?;

    let orders = OrderRepository::new(state.pool())
        .list_by_cook(profile.id)
        .await?;

    let dish_count = DishRepository::new(state.pool())
        .list_by_cook(profile.id)
        .await?
        .len();

    Ok(DashboardTemplate {
        profile: ProfileView::from(&profile),
        orders: orders.iter().map(IncomingOrderView::from).collect(),
        dish_count,
    })
}

/// Apply a workflow action to an incoming order.
pub async fn order_status(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
    Path(id): Path<i64>,
    Form(form): Form<OrderActionForm>,
) -> Result<Response, AppError> {
    let profile = profile_for(&state, user.id).await?;

    if !profile.can_sell() {
        return Err(AppError::BadRequest(
            "your kitchen is not approved to take orders".to_owned(),
        ));
    }

    let action = CookAction::parse(&form.action)
        .ok_or_else(|| AppError::BadRequest(format!("unknown action '{}'", form.action)))?;

    OrderService::new(state.pool())
        .apply_cook_action(OrderId::new(id), profile.id, action)
        .await?;

    Ok(Redirect::to("/cook/dashboard").into_response())
}

// =============================================================================
// Dish management
// =============================================================================

/// Display the dish management page.
pub async fn dishes(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
) -> Result<impl IntoResponse, AppError> {
    let profile = profile_for(&state, user.id).await?;

    let dishes = DishRepository::new(state.pool())
        .list_by_cook(profile.id)
        .await?;

    Ok(DishesTemplate {
        profile: ProfileView::from(&profile),
        dishes: dishes
            .iter()
            .map(|d| CookDishView {
                id: d.id.as_i64(),
                name: d.name.clone(),
                price: d.price.to_string(),
                serves: d.serves,
                is_veg: d.is_veg,
                available: d.available,
            })
            .collect(),
    })
}

/// Display the new-dish form.
pub async fn new_dish(RequireCook(_user): RequireCook) -> impl IntoResponse {
    DishFormTemplate {
        editing: false,
        dish_id: 0,
        name: String::new(),
        description: String::new(),
        price: String::new(),
        serves: 1,
        is_veg: true,
        available: true,
    }
}

/// Create a dish.
pub async fn create_dish(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
    Form(form): Form<DishForm>,
) -> Result<Response, AppError> {
    let profile = profile_for(&state, user.id).await?;
    let input = form.into_input()?;

    DishRepository::new(state.pool())
        .create(profile.id, &input)
        .await?;

    state.invalidate_dish_cache().await;

    Ok(Redirect::to("/cook/dishes").into_response())
}

/// Display the edit form for one of the cook's own dishes.
pub async fn edit_dish(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let profile = profile_for(&state, user.id).await?;

    let dish = DishRepository::new(state.pool())
        .get_by_id(DishId::new(id))
        .await?
        .filter(|d| d.cook_id == profile.id)
        .ok_or_else(|| AppError::NotFound(format!("dish {id}")))?;

    Ok(DishFormTemplate {
        editing: true,
        dish_id: dish.id.as_i64(),
        name: dish.name,
        description: dish.description,
        price: dish.price.amount().to_string(),
        serves: dish.serves,
        is_veg: dish.is_veg,
        available: dish.available,
    })
}

/// Update one of the cook's own dishes.
pub async fn update_dish(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
    Path(id): Path<i64>,
    Form(form): Form<DishForm>,
) -> Result<Response, AppError> {
    let profile = profile_for(&state, user.id).await?;
    let input = form.into_input()?;

    DishRepository::new(state.pool())
        .update(DishId::new(id), profile.id, &input)
        .await?;

    state.invalidate_dish_cache().await;

    Ok(Redirect::to("/cook/dishes").into_response())
}

/// Delete one of the cook's own dishes.
pub async fn delete_dish(
    State(state): State<AppState>,
    RequireCook(user): RequireCook,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let profile = profile_for(&state, user.id).await?;

    DishRepository::new(state.pool())
        .delete(DishId::new(id), profile.id)
        .await?;

    state.invalidate_dish_cache().await;

    Ok(Redirect::to("/cook/dishes").into_response())
}
