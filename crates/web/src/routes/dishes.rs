//! Catalog route handlers: browse listing and dish detail.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use homeplate_core::DishId;

use crate::db::{CookRepository, DishRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::Dish;
use crate::state::AppState;

/// Dish display data for templates.
#[derive(Clone)]
pub struct DishView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: String,
    pub serves: i32,
    pub is_veg: bool,
}

impl From<&Dish> for DishView {
    fn from(dish: &Dish) -> Self {
        Self {
            id: dish.id.as_i64(),
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price.to_string(),
            serves: dish.serves,
            is_veg: dish.is_veg,
        }
    }
}

/// Browse page template.
#[derive(Template, WebTemplate)]
#[template(path = "browse.html")]
pub struct BrowseTemplate {
    pub logged_in: bool,
    pub dishes: Vec<DishView>,
}

/// Dish detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "dish_detail.html")]
pub struct DishDetailTemplate {
    pub logged_in: bool,
    pub dish: DishView,
    pub kitchen_name: String,
    pub campus_area: String,
}

/// Display the browse listing.
///
/// Served from the catalog cache; the page is identical for guests and
/// students apart from the add-to-cart buttons.
pub async fn browse(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse, AppError> {
    let dishes = state
        .available_dishes()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(BrowseTemplate {
        logged_in: user.is_some(),
        dishes: dishes.iter().map(DishView::from).collect(),
    })
}

/// Display a dish detail page.
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let dish_id = DishId::new(id);

    let dish = DishRepository::new(state.pool())
        .get_by_id(dish_id)
        .await?
        .filter(|d| d.available)
        .ok_or_else(|| AppError::NotFound(format!("dish {id}")))?;

    let cook = CookRepository::new(state.pool())
        .get_by_id(dish.cook_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cook for dish {id}")))?;

    // Suspended and pending cooks drop off the public catalog entirely.
    if !cook.can_sell() {
        return Err(AppError::NotFound(format!("dish {id}")));
    }

    Ok(DishDetailTemplate {
        logged_in: user.is_some(),
        dish: DishView::from(&dish),
        kitchen_name: cook.kitchen_name,
        campus_area: cook.campus_area,
    })
}
