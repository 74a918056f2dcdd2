//! Admin flag management.

use tracing::info;

use juniper_api::db::{self, UserRepository};

/// Grant or revoke the admin flag on an existing user.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the user doesn't
/// exist.
pub async fn set_admin(username: &str, is_admin: bool) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;
    let users = UserRepository::new(&pool);

    let updated = users.set_admin(username, is_admin).await?;
    if !updated {
        return Err(format!("no such user: {username}").into());
    }

    info!(username, is_admin, "admin flag updated");
    Ok(())
}
