//! Database migration command.
//!
//! Runs the schema migrations embedded from `crates/web/migrations/` and
//! then the tower-sessions store migration (which owns its own table).
//! Migrations never run automatically on web startup; this command is the
//! only path.

use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use super::connect;

/// Run all migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    info!("Running schema migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    info!("Running session store migration...");
    PostgresStore::new(pool).migrate().await?;

    info!("Migrations complete!");
    Ok(())
}
