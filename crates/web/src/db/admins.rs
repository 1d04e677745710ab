//! Admin-membership repository.
//!
//! The admin set is a bare membership table: a `user_id` row means the
//! user is an admin. Role resolution only ever asks "is this id present",
//! so the predicate query is the hot path and stays a simple EXISTS.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use homeplate_core::{Email, UserId};

use super::RepositoryError;

/// An admin-membership entry joined with its user, for the admin UI.
#[derive(Debug, Clone)]
pub struct AdminMember {
    /// The admin user's id.
    pub user_id: UserId,
    /// The admin user's email.
    pub email: Email,
    /// The admin user's display name.
    pub name: String,
    /// When membership was granted.
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AdminMemberRow {
    user_id: i64,
    email: String,
    name: String,
    granted_at: DateTime<Utc>,
}

impl TryFrom<AdminMemberRow> for AdminMember {
    type Error = RepositoryError;

    fn try_from(row: AdminMemberRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            user_id: UserId::new(row.user_id),
            email,
            name: row.name,
            granted_at: row.granted_at,
        })
    }
}

/// Repository for the admin-membership set.
pub struct AdminMemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminMemberRepository<'a> {
    /// Create a new admin-membership repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The admin-membership predicate: is this user in the admin set?
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn is_member(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM admin_member WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;
        Ok(row.0)
    }

    /// List all admin members, newest grant first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminMemberRow>(
            r"
            SELECT m.user_id, u.email, u.name, m.granted_at
            FROM admin_member m
            JOIN app_user u ON u.id = m.user_id
            ORDER BY m.granted_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Grant admin membership to a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user is already a member.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn grant(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO admin_member (user_id) VALUES ($1)")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("user is already an admin".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        Ok(())
    }

    /// Revoke admin membership.
    ///
    /// Refuses to remove the last remaining member so the admin surface
    /// cannot be locked out from within itself.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user is not a member.
    /// Returns `RepositoryError::Conflict` if the user is the last member.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn revoke(&self, user_id: UserId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_member")
            .fetch_one(&mut *tx)
            .await?;

        if count.0 <= 1 {
            return Err(RepositoryError::Conflict(
                "cannot revoke the last admin".to_owned(),
            ));
        }

        let result = sqlx::query("DELETE FROM admin_member WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}
