//! CLI commands dispatched from `main` before normal server startup.

use anyhow::Context;
use sqlx::PgPool;

/// Create an admin account directly in the database.
///
/// Used to bootstrap a deployment before any admin exists to call the
/// user-management endpoints.
pub async fn create_admin(
    pool: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let hashed = bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;

    sqlx::query(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, 'admin')",
    )
    .bind(name)
    .bind(email.to_lowercase())
    .bind(hashed)
    .execute(pool)
    .await
    .context("Failed to create admin user (is the email already taken?)")?;

    Ok(())
}
