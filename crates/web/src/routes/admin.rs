//! Admin surface route handlers.
//!
//! Every handler requires the admin role via `RequireAdmin`; membership is
//! re-resolved per request, so a revoked admin loses access immediately.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use homeplate_core::{CookId, CookStatus, Email, UserId};

use crate::db::{
    AdminMemberRepository, CookRepository, OrderRepository, RepositoryError, UserRepository,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Grant-admin form data.
#[derive(Debug, Deserialize)]
pub struct GrantMemberForm {
    pub email: String,
}

// =============================================================================
// View Types
// =============================================================================

/// Cook row display data for the approval queue.
pub struct CookRowView {
    pub id: i64,
    pub kitchen_name: String,
    pub campus_area: String,
    pub status: String,
    pub can_approve: bool,
    pub can_suspend: bool,
    pub applied_on: String,
}

/// Order row display data for the admin order list.
pub struct OrderRowView {
    pub id: i64,
    pub status: String,
    pub total: String,
    pub placed_on: String,
}

/// Admin member row display data.
pub struct MemberRowView {
    pub user_id: i64,
    pub email: String,
    pub name: String,
    pub granted_on: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub user_count: i64,
    pub cook_count: i64,
    pub order_count: i64,
    pub delivered_revenue: String,
}

/// Cook approval queue template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/cooks.html")]
pub struct AdminCooksTemplate {
    pub cooks: Vec<CookRowView>,
}

/// Admin order list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub orders: Vec<OrderRowView>,
}

/// Admin membership template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/members.html")]
pub struct AdminMembersTemplate {
    pub members: Vec<MemberRowView>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let user_count = UserRepository::new(state.pool()).count().await?;
    let cook_count = CookRepository::new(state.pool()).count().await?;
    let (order_count, delivered_revenue) = OrderRepository::new(state.pool()).stats().await?;

    Ok(AdminDashboardTemplate {
        user_count,
        cook_count,
        order_count,
        delivered_revenue: delivered_revenue.to_string(),
    })
}

/// Display the cook approval queue.
pub async fn cooks(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let cooks = CookRepository::new(state.pool()).list_all().await?;

    Ok(AdminCooksTemplate {
        cooks: cooks
            .iter()
            .map(|c| CookRowView {
                id: c.id.as_i64(),
                kitchen_name: c.kitchen_name.clone(),
                campus_area: c.campus_area.clone(),
                status: c.status.to_string(),
                can_approve: c.status != CookStatus::Approved,
                can_suspend: c.status == CookStatus::Approved,
                applied_on: c.created_at.format("%d %b %Y").to_string(),
            })
            .collect(),
    })
}

/// Approve a cook.
pub async fn approve_cook(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    CookRepository::new(state.pool())
        .set_status(CookId::new(id), CookStatus::Approved)
        .await?;

    state.invalidate_dish_cache().await;

    tracing::info!(cook_id = id, admin = %admin.email, "cook approved");

    Ok(Redirect::to("/admin/cooks").into_response())
}

/// Suspend a cook.
pub async fn suspend_cook(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    CookRepository::new(state.pool())
        .set_status(CookId::new(id), CookStatus::Suspended)
        .await?;

    // Their dishes vanish from the browse page with the cache.
    state.invalidate_dish_cache().await;

    tracing::warn!(cook_id = id, admin = %admin.email, "cook suspended");

    Ok(Redirect::to("/admin/cooks").into_response())
}

/// Display all orders.
pub async fn orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(AdminOrdersTemplate {
        orders: orders
            .iter()
            .map(|o| OrderRowView {
                id: o.id.as_i64(),
                status: o.status.to_string(),
                total: o.total.to_string(),
                placed_on: o.created_at.format("%d %b %Y, %H:%M").to_string(),
            })
            .collect(),
    })
}

/// Display the admin membership page.
pub async fn members(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let members = AdminMemberRepository::new(state.pool()).list_all().await?;

    Ok(AdminMembersTemplate {
        members: members
            .iter()
            .map(|m| MemberRowView {
                user_id: m.user_id.as_i64(),
                email: m.email.to_string(),
                name: m.name.clone(),
                granted_on: m.granted_at.format("%d %b %Y").to_string(),
            })
            .collect(),
        error: query.error,
    })
}

/// Grant admin membership by email.
pub async fn grant_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<GrantMemberForm>,
) -> Result<Response, AppError> {
    let Ok(email) = Email::parse(form.email.trim()) else {
        return Ok(Redirect::to("/admin/members?error=invalid_email").into_response());
    };

    let Some(user) = UserRepository::new(state.pool()).get_by_email(&email).await? else {
        return Ok(Redirect::to("/admin/members?error=no_such_user").into_response());
    };

    match AdminMemberRepository::new(state.pool()).grant(user.id).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, granted_by = %admin.email, "admin membership granted");
            Ok(Redirect::to("/admin/members").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/admin/members?error=already_member").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Revoke admin membership.
pub async fn revoke_member(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<i64>,
) -> Result<Response, AppError> {
    match AdminMemberRepository::new(state.pool())
        .revoke(UserId::new(user_id))
        .await
    {
        Ok(()) => {
            tracing::warn!(user_id, revoked_by = %admin.email, "admin membership revoked");
            Ok(Redirect::to("/admin/members").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/admin/members?error=last_admin").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/admin/members?error=not_member").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
