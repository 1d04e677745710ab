//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::db::{DishRepository, RepositoryError};
use crate::models::Dish;
use crate::payments::RazorpayClient;
use crate::services::roles::{PgRoleSources, RoleResolver};

/// Catalog cache TTL. Dish edits show up on the browse page within this
/// window; detail pages always read fresh.
const DISH_CACHE_TTL: Duration = Duration::from_secs(60);

const DISH_CACHE_KEY: &str = "available_dishes";

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the database pool, configuration,
/// the gateway client, the role resolver, and the catalog cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    razorpay: RazorpayClient,
    roles: RoleResolver<PgRoleSources>,
    dish_cache: Cache<&'static str, Arc<Vec<Dish>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let razorpay = RazorpayClient::new(&config.razorpay);
        let roles = RoleResolver::new(PgRoleSources::new(pool.clone()));
        let dish_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(DISH_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                razorpay,
                roles,
                dish_cache,
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn razorpay(&self) -> &RazorpayClient {
        &self.inner.razorpay
    }

    /// Get a reference to the role resolver.
    #[must_use]
    pub fn roles(&self) -> &RoleResolver<PgRoleSources> {
        &self.inner.roles
    }

    /// The public browse catalog, cached for a minute.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying query fails on a cache
    /// miss.
    pub async fn available_dishes(&self) -> Result<Arc<Vec<Dish>>, Arc<RepositoryError>> {
        let pool = self.inner.pool.clone();
        self.inner
            .dish_cache
            .try_get_with(DISH_CACHE_KEY, async move {
                let dishes = DishRepository::new(&pool).list_available().await?;
                Ok(Arc::new(dishes))
            })
            .await
    }

    /// Drop the cached catalog (called after dish writes so cooks see
    /// their own edits promptly).
    pub async fn invalidate_dish_cache(&self) {
        self.inner.dish_cache.invalidate(&DISH_CACHE_KEY).await;
    }
}
