//! Seed the database from a YAML file.
//!
//! Intended for development and staging. The file describes users, cooks
//! (with their dishes), and admin grants:
//!
//! ```yaml
//! users:
//!   - email: priya@campus.edu
//!     name: Priya
//!     password: dev-only-pw-1
//! cooks:
//!   - email: asha@campus.edu
//!     name: Asha
//!     password: dev-only-pw-2
//!     kitchen_name: "Asha's Kitchen"
//!     campus_area: North hostels
//!     approved: true
//!     dishes:
//!       - name: Rajma chawal
//!         description: Slow-cooked rajma over rice
//!         price: "90.00"
//!         serves: 1
//!         is_veg: true
//! admins:
//!   - priya@campus.edu
//! ```
//!
//! Seeding is not idempotent: existing emails are skipped with a warning
//! rather than updated.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use homeplate_core::{CookStatus, Email, Price};
use homeplate_web::db::dishes::DishInput;
use homeplate_web::db::{AdminMemberRepository, CookRepository, DishRepository, UserRepository};
use homeplate_web::services::auth::AuthService;

use super::connect;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<SeedUser>,
    #[serde(default)]
    cooks: Vec<SeedCook>,
    #[serde(default)]
    admins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    email: String,
    name: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SeedCook {
    email: String,
    name: String,
    password: String,
    kitchen_name: String,
    #[serde(default)]
    bio: String,
    campus_area: String,
    #[serde(default)]
    approved: bool,
    #[serde(default)]
    dishes: Vec<SeedDish>,
}

#[derive(Debug, Deserialize)]
struct SeedDish {
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default = "default_serves")]
    serves: i32,
    #[serde(default)]
    is_veg: bool,
}

const fn default_serves() -> i32 {
    1
}

/// Seed the database from `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or a database
/// write fails.
pub async fn run(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    let contents = std::fs::read_to_string(path)?;
    let seed: SeedFile = serde_yaml::from_str(&contents)?;

    let pool = connect().await?;
    let auth = AuthService::new(&pool);

    for user in &seed.users {
        match auth.register(&user.email, &user.name, &user.password).await {
            Ok(created) => info!(email = %user.email, user_id = %created.id, "seeded user"),
            Err(homeplate_web::services::auth::AuthError::UserAlreadyExists) => {
                warn!(email = %user.email, "user already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    for cook in &seed.cooks {
        let user = match auth.register(&cook.email, &cook.name, &cook.password).await {
            Ok(created) => created,
            Err(homeplate_web::services::auth::AuthError::UserAlreadyExists) => {
                warn!(email = %cook.email, "cook user already exists, skipping");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let profile = CookRepository::new(&pool)
            .create(user.id, &cook.kitchen_name, &cook.bio, &cook.campus_area)
            .await?;

        if cook.approved {
            CookRepository::new(&pool)
                .set_status(profile.id, CookStatus::Approved)
                .await?;
        }

        for dish in &cook.dishes {
            DishRepository::new(&pool)
                .create(
                    profile.id,
                    &DishInput {
                        name: dish.name.clone(),
                        description: dish.description.clone(),
                        price: Price::new(dish.price),
                        serves: dish.serves,
                        is_veg: dish.is_veg,
                        available: true,
                    },
                )
                .await?;
        }

        info!(email = %cook.email, kitchen = %cook.kitchen_name,
            dishes = cook.dishes.len(), "seeded cook");
    }

    for admin_email in &seed.admins {
        let email = Email::parse(admin_email)?;
        let Some(user) = UserRepository::new(&pool).get_by_email(&email).await? else {
            warn!(email = %admin_email, "admin email not found among seeded users, skipping");
            continue;
        };

        match AdminMemberRepository::new(&pool).grant(user.id).await {
            Ok(()) => info!(email = %admin_email, "seeded admin membership"),
            Err(homeplate_web::db::RepositoryError::Conflict(_)) => {
                warn!(email = %admin_email, "already an admin, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    info!("Seeding complete!");
    Ok(())
}
