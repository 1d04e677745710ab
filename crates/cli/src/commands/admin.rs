//! Admin-membership management commands.
//!
//! The first admin has to come from here - the web UI can only be used to
//! grant further memberships once someone can reach `/admin/members`.

use tracing::info;

use homeplate_core::Email;
use homeplate_web::db::{AdminMemberRepository, UserRepository};

use super::connect;

/// Grant admin membership to an existing user by email.
///
/// # Errors
///
/// Returns an error if the user doesn't exist or the grant fails.
pub async fn grant(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let email = Email::parse(email)?;
    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("no user with email {email}"))?;

    AdminMemberRepository::new(&pool).grant(user.id).await?;

    info!(%email, user_id = %user.id, "admin membership granted");
    Ok(())
}

/// Revoke admin membership by email.
///
/// # Errors
///
/// Returns an error if the user doesn't exist, isn't a member, or is the
/// last remaining member.
pub async fn revoke(email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let email = Email::parse(email)?;
    let user = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("no user with email {email}"))?;

    AdminMemberRepository::new(&pool).revoke(user.id).await?;

    info!(%email, user_id = %user.id, "admin membership revoked");
    Ok(())
}

/// List all admin members.
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    let members = AdminMemberRepository::new(&pool).list_all().await?;

    if members.is_empty() {
        info!("no admin members - grant one with: hp-cli admin grant -e <email>");
        return Ok(());
    }

    for member in members {
        info!(user_id = %member.user_id, email = %member.email, name = %member.name,
            granted_at = %member.granted_at, "admin member");
    }

    Ok(())
}
