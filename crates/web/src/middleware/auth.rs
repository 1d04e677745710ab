//! Authentication and role-guard middleware.
//!
//! Route handlers declare their requirements through extractors:
//!
//! - [`RequireAuth`] - any authenticated user
//! - [`RequireAdmin`] - resolved role must be admin
//! - [`RequireCook`] - resolved role must be cook
//! - [`OptionalAuth`] - identity if present, no gating
//!
//! Extraction runs before the handler body, so a page's children are never
//! rendered while identity or role is still unknown: the request is either
//! authorized (handler runs) or redirected (handler never runs). All
//! decisions go through [`GuardPolicy`], which keeps the rules testable
//! without a database.
//!
//! Authorization failures are control flow, not errors: page requests get
//! a redirect to the login or unauthorized page, `/api/` requests get a
//! bare 401/403.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use homeplate_core::Role;

use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Path guests are sent to when authentication is required.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path users are sent to when their role doesn't meet a requirement.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

// =============================================================================
// Guard policy
// =============================================================================

/// Declarative requirements for a guarded route.
///
/// Defaults mirror the common case: authentication required, no role
/// requirement, failed auth redirects to the login page.
#[derive(Debug, Clone)]
pub struct GuardPolicy {
    /// Require a logged-in identity (default true).
    pub require_auth: bool,
    /// Require the resolved role to be admin (default false).
    pub require_admin: bool,
    /// Require the resolved role to be cook (default false).
    pub require_cook: bool,
    /// Where to send unauthenticated users (default the login page).
    pub redirect_to: &'static str,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            require_auth: true,
            require_admin: false,
            require_cook: false,
            redirect_to: LOGIN_PATH,
        }
    }
}

/// The decision a guard reaches once identity and role are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// All requirements hold; render the page.
    Authorized,
    /// Some requirement failed; navigate away and render nothing.
    Redirect(String),
}

impl GuardPolicy {
    /// Policy for admin-only routes.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            require_admin: true,
            ..Self::default()
        }
    }

    /// Policy for cook-only routes.
    #[must_use]
    pub fn cook() -> Self {
        Self {
            require_cook: true,
            ..Self::default()
        }
    }

    /// Evaluate the policy against a resolved identity and role.
    ///
    /// `role` is `None` when there is no identity (role resolution never
    /// ran). Checks run in requirement order: auth first, then role.
    #[must_use]
    pub fn evaluate(&self, identity_present: bool, role: Option<Role>) -> GuardOutcome {
        if self.require_auth && !identity_present {
            return GuardOutcome::Redirect(self.redirect_to.to_owned());
        }

        if self.require_admin && role != Some(Role::Admin) {
            return GuardOutcome::Redirect(UNAUTHORIZED_PATH.to_owned());
        }

        if self.require_cook && role != Some(Role::Cook) {
            return GuardOutcome::Redirect(UNAUTHORIZED_PATH.to_owned());
        }

        GuardOutcome::Authorized
    }
}

// =============================================================================
// Rejections
// =============================================================================

/// Response produced when a guard turns a request away.
pub enum GuardRejection {
    /// Client-side navigation for page requests.
    Redirect(String),
    /// 401 for unauthenticated API requests.
    Unauthorized,
    /// 403 for authenticated API requests with the wrong role.
    Forbidden,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(path) => Redirect::to(&path).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Your account does not have access to this page",
            )
                .into_response(),
        }
    }
}

/// Whether this request should get API-style status codes instead of
/// redirects.
fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}

async fn current_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

fn reject(outcome: GuardOutcome, parts: &Parts, authenticated: bool) -> Option<GuardRejection> {
    match outcome {
        GuardOutcome::Authorized => None,
        GuardOutcome::Redirect(path) => Some(if is_api_request(parts) {
            if authenticated {
                GuardRejection::Forbidden
            } else {
                GuardRejection::Unauthorized
            }
        } else {
            GuardRejection::Redirect(path)
        }),
    }
}

// =============================================================================
// Extractors
// =============================================================================

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn orders(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("orders for {}", user.email)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;

        match reject(
            GuardPolicy::default().evaluate(user.is_some(), None),
            parts,
            false,
        ) {
            None => Ok(Self(user.ok_or(GuardRejection::Unauthorized)?)),
            Some(rejection) => Err(rejection),
        }
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this never rejects the request.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts).await))
    }
}

/// Extractor that requires the resolved role to be admin.
///
/// Resolves the role fresh on every request; admin membership revoked
/// mid-session locks the user out on their next request.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;

        let role = match &user {
            Some(u) => Some(state.roles().resolve(u.id).await.role),
            None => None,
        };

        match reject(
            GuardPolicy::admin().evaluate(user.is_some(), role),
            parts,
            user.is_some(),
        ) {
            None => Ok(Self(user.ok_or(GuardRejection::Unauthorized)?)),
            Some(rejection) => Err(rejection),
        }
    }
}

/// Extractor that requires the resolved role to be cook.
pub struct RequireCook(pub CurrentUser);

impl FromRequestParts<AppState> for RequireCook {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user(parts).await;

        let role = match &user {
            Some(u) => Some(state.roles().resolve(u.id).await.role),
            None => None,
        };

        match reject(
            GuardPolicy::cook().evaluate(user.is_some(), role),
            parts,
            user.is_some(),
        ) {
            None => Ok(Self(user.ok_or(GuardRejection::Unauthorized)?)),
            Some(rejection) => Err(rejection),
        }
    }
}

// =============================================================================
// Session helpers
// =============================================================================

/// Helper to set the current user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// The whole session is flushed, not just the identity key, so cart
/// contents don't leak across accounts on a shared machine.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    #[test]
    fn test_no_identity_redirects_to_login() {
        // Scenario D: signed out, default guard settings.
        let outcome = GuardPolicy::default().evaluate(false, None);
        assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_PATH.to_owned()));
    }

    #[test]
    fn test_no_identity_respects_configured_redirect() {
        let policy = GuardPolicy {
            redirect_to: "/auth/login?next=checkout",
            ..GuardPolicy::default()
        };
        assert_eq!(
            policy.evaluate(false, None),
            GuardOutcome::Redirect("/auth/login?next=checkout".to_owned())
        );
    }

    #[test]
    fn test_authenticated_user_passes_default_policy() {
        let outcome = GuardPolicy::default().evaluate(true, Some(Role::Student));
        assert_eq!(outcome, GuardOutcome::Authorized);
    }

    #[test]
    fn test_children_render_iff_role_matches() {
        for (policy, role, authorized) in [
            (GuardPolicy::admin(), Role::Admin, true),
            (GuardPolicy::admin(), Role::Cook, false),
            (GuardPolicy::admin(), Role::Student, false),
            (GuardPolicy::cook(), Role::Cook, true),
            (GuardPolicy::cook(), Role::Admin, false),
            (GuardPolicy::cook(), Role::Student, false),
        ] {
            let outcome = policy.evaluate(true, Some(role));
            assert_eq!(
                outcome == GuardOutcome::Authorized,
                authorized,
                "policy {policy:?} with role {role} expected authorized={authorized}"
            );
        }
    }

    #[test]
    fn test_student_on_cook_page_goes_to_unauthorized() {
        // Scenario A, guard half: student hits a requireCook page.
        let outcome = GuardPolicy::cook().evaluate(true, Some(Role::Student));
        assert_eq!(
            outcome,
            GuardOutcome::Redirect(UNAUTHORIZED_PATH.to_owned())
        );
    }

    #[test]
    fn test_role_requirement_still_needs_identity() {
        let outcome = GuardPolicy::admin().evaluate(false, None);
        assert_eq!(outcome, GuardOutcome::Redirect(LOGIN_PATH.to_owned()));
    }

    #[test]
    fn test_rejection_redirect_response() {
        let response = GuardRejection::Redirect(LOGIN_PATH.to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), LOGIN_PATH);
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            GuardRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GuardRejection::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
