//! Database configuration and connection pool initialization.
//!
//! The database URL is read from the `DATABASE_URL` environment variable.
//!
//! # Panics
//!
//! [`init_db_pool`] panics if `DATABASE_URL` is not set or the connection
//! cannot be established. This is intentional: the application cannot do
//! anything useful without a database, so startup fails loudly.

use sqlx::PgPool;
use std::env;

/// Initializes a PostgreSQL connection pool.
///
/// Called once during application startup. The returned pool is cheaply
/// cloneable and shared through [`crate::state::AppState`] for all
/// request handlers.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
