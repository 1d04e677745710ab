//! Role resolution.
//!
//! Maps an authenticated user to exactly one [`Role`] by consulting two
//! independent sources of truth, in a fixed order:
//!
//! 1. the admin-membership set - membership wins outright;
//! 2. cook-profile existence;
//! 3. otherwise the default, `Student`.
//!
//! Role is a point-in-time computation: nothing is cached between calls,
//! so membership changes take effect on the next request. A failed source
//! query is logged and treated as "not privileged" for that source - a
//! transient database error must never mint admin access, and a page
//! render must never crash on a privilege check.

use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::PgPool;

use homeplate_core::{Role, UserId};

use crate::db::{AdminMemberRepository, CookRepository, RepositoryError};

/// The two membership queries behind role resolution.
///
/// Split out as a trait so the resolution order and fallback rules can be
/// exercised without a database.
pub trait RoleSources {
    /// Whether the user is in the admin-membership set.
    fn is_admin(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Whether a cook profile exists for the user.
    fn cook_profile_exists(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}

/// Postgres-backed role sources.
#[derive(Clone)]
pub struct PgRoleSources {
    pool: PgPool,
}

impl PgRoleSources {
    /// Create role sources over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RoleSources for PgRoleSources {
    async fn is_admin(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        AdminMemberRepository::new(&self.pool)
            .is_member(user_id)
            .await
    }

    async fn cook_profile_exists(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        CookRepository::new(&self.pool)
            .exists_for_user(user_id)
            .await
    }
}

/// One completed role resolution.
///
/// `seq` is a process-local, strictly increasing tag. When several
/// resolutions race (e.g., a sign-out lands while a page request is in
/// flight), the tag makes "which resolution is newest" explicit in traces
/// and lets callers discard anything stale they may be holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The resolved role.
    pub role: Role,
    /// Strictly increasing resolution tag.
    pub seq: u64,
}

/// Resolves users to roles.
pub struct RoleResolver<S> {
    sources: S,
    seq: AtomicU64,
}

impl<S: RoleSources> RoleResolver<S> {
    /// Create a resolver over the given sources.
    #[must_use]
    pub const fn new(sources: S) -> Self {
        Self {
            sources,
            seq: AtomicU64::new(0),
        }
    }

    /// Resolve the role for a user.
    ///
    /// The admin check strictly precedes the cook check, so a user present
    /// in both sets resolves to `Admin`. Each call re-queries both sources;
    /// there is no caching between resolutions.
    pub async fn resolve(&self, user_id: UserId) -> Resolution {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed) + 1;

        let is_admin = match self.sources.is_admin(user_id).await {
            Ok(member) => member,
            Err(e) => {
                tracing::warn!(%user_id, seq, error = %e, "admin membership check failed, treating as non-admin");
                false
            }
        };

        if is_admin {
            return Resolution {
                role: Role::Admin,
                seq,
            };
        }

        let is_cook = match self.sources.cook_profile_exists(user_id).await {
            Ok(exists) => exists,
            Err(e) => {
                tracing::warn!(%user_id, seq, error = %e, "cook profile check failed, treating as non-cook");
                false
            }
        };

        let role = if is_cook { Role::Cook } else { Role::Student };

        Resolution { role, seq }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// In-memory role sources with switchable failures.
    #[derive(Default)]
    struct StubSources {
        admins: HashSet<i64>,
        cooks: HashSet<i64>,
        admin_query_fails: bool,
        cook_query_fails: bool,
    }

    impl RoleSources for StubSources {
        async fn is_admin(&self, user_id: UserId) -> Result<bool, RepositoryError> {
            if self.admin_query_fails {
                return Err(RepositoryError::NotFound);
            }
            Ok(self.admins.contains(&user_id.as_i64()))
        }

        async fn cook_profile_exists(&self, user_id: UserId) -> Result<bool, RepositoryError> {
            if self.cook_query_fails {
                return Err(RepositoryError::NotFound);
            }
            Ok(self.cooks.contains(&user_id.as_i64()))
        }
    }

    fn resolver(sources: StubSources) -> RoleResolver<StubSources> {
        RoleResolver::new(sources)
    }

    #[tokio::test]
    async fn test_user_in_neither_set_is_student() {
        // Scenario A: "u1" has no admin membership and no cook profile.
        let r = resolver(StubSources::default());
        assert_eq!(r.resolve(UserId::new(1)).await.role, Role::Student);
    }

    #[tokio::test]
    async fn test_cook_profile_resolves_cook() {
        // Scenario B: "u2" has a cook profile row.
        let r = resolver(StubSources {
            cooks: HashSet::from([2]),
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(2)).await.role, Role::Cook);
    }

    #[tokio::test]
    async fn test_admin_takes_precedence_over_cook() {
        // Scenario C: "u3" is in the admin set AND has a cook profile.
        let r = resolver(StubSources {
            admins: HashSet::from([3]),
            cooks: HashSet::from([3]),
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(3)).await.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_admin_only_resolves_admin() {
        let r = resolver(StubSources {
            admins: HashSet::from([4]),
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(4)).await.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent_over_unchanged_facts() {
        let r = resolver(StubSources {
            cooks: HashSet::from([5]),
            ..Default::default()
        });
        let first = r.resolve(UserId::new(5)).await;
        let second = r.resolve(UserId::new(5)).await;
        assert_eq!(first.role, second.role);
    }

    #[tokio::test]
    async fn test_sequence_numbers_strictly_increase() {
        let r = resolver(StubSources::default());
        let a = r.resolve(UserId::new(1)).await;
        let b = r.resolve(UserId::new(1)).await;
        let c = r.resolve(UserId::new(2)).await;
        assert!(a.seq < b.seq);
        assert!(b.seq < c.seq);
    }

    #[tokio::test]
    async fn test_failed_admin_query_never_grants_admin() {
        let r = resolver(StubSources {
            admins: HashSet::from([6]),
            admin_query_fails: true,
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(6)).await.role, Role::Student);
    }

    #[tokio::test]
    async fn test_failed_admin_query_does_not_mask_cook_membership() {
        let r = resolver(StubSources {
            cooks: HashSet::from([7]),
            admin_query_fails: true,
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(7)).await.role, Role::Cook);
    }

    #[tokio::test]
    async fn test_failed_cook_query_falls_back_to_student() {
        let r = resolver(StubSources {
            cooks: HashSet::from([8]),
            cook_query_fails: true,
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(8)).await.role, Role::Student);
    }

    #[tokio::test]
    async fn test_both_queries_failing_falls_back_to_student() {
        let r = resolver(StubSources {
            admins: HashSet::from([9]),
            cooks: HashSet::from([9]),
            admin_query_fails: true,
            cook_query_fails: true,
            ..Default::default()
        });
        assert_eq!(r.resolve(UserId::new(9)).await.role, Role::Student);
    }
}
