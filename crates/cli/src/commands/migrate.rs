//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! jm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `JUNIPER_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)

use tracing::info;

use juniper_api::db;

/// Run the API database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
