//! Shared landing page and the role-based redirector.
//!
//! The landing page is public: guests and students see the featured
//! dishes, while cooks and admins are sent straight to their dashboards.
//! Unlike the guards in `middleware::auth`, the redirector never blocks -
//! absence of identity simply renders the page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use homeplate_core::Role;

use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::dishes::DishView;
use crate::state::AppState;

/// Where a resolved role should be redirected away from shared pages,
/// if anywhere.
///
/// Students (and guests, passed as `None`) stay; cooks and admins go to
/// their dashboards. Role is a closed enum, so there is no "unrecognized"
/// case left to send to a fallback page.
#[must_use]
pub fn role_landing_redirect(role: Option<Role>) -> Option<Redirect> {
    role.and_then(|r| r.dashboard_path()).map(Redirect::to)
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user_name: Option<String>,
    pub dishes: Vec<DishView>,
}

/// Unauthorized page template.
#[derive(Template, WebTemplate)]
#[template(path = "unauthorized.html")]
pub struct UnauthorizedTemplate {}

/// Display the landing page, redirecting cooks and admins to their
/// dashboards.
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<Response, AppError> {
    let mut user_name = None;

    if let Some(user) = user {
        let resolution = state.roles().resolve(user.id).await;
        if let Some(redirect) = role_landing_redirect(Some(resolution.role)) {
            return Ok(redirect.into_response());
        }
        user_name = Some(user.name);
    }

    let dishes = state
        .available_dishes()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let dishes = dishes.iter().take(6).map(DishView::from).collect();

    Ok(HomeTemplate { user_name, dishes }.into_response())
}

/// Display the unauthorized page.
pub async fn unauthorized() -> impl IntoResponse {
    UnauthorizedTemplate {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    fn location(redirect: Redirect) -> String {
        redirect
            .into_response()
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    }

    #[test]
    fn test_cook_is_sent_to_cook_dashboard() {
        // Scenario B, redirector half.
        let redirect = role_landing_redirect(Some(Role::Cook)).expect("cook should redirect");
        assert_eq!(location(redirect), "/cook/dashboard");
    }

    #[test]
    fn test_admin_is_sent_to_admin_dashboard() {
        let redirect = role_landing_redirect(Some(Role::Admin)).expect("admin should redirect");
        assert_eq!(location(redirect), "/admin/dashboard");
    }

    #[test]
    fn test_student_stays_on_page() {
        assert!(role_landing_redirect(Some(Role::Student)).is_none());
    }

    #[test]
    fn test_guest_stays_on_page() {
        // The redirector never blocks unauthenticated visitors.
        assert!(role_landing_redirect(None).is_none());
    }
}
