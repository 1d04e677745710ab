//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the application database using the same environment lookup
/// as the web binary.
pub async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("HOMEPLATE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "HOMEPLATE_DATABASE_URL not set")?;

    let pool = homeplate_web::db::create_pool(&database_url).await?;
    Ok(pool)
}
