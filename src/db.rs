//! Database helpers for the resource API.
//!
//! Provides the type alias for the application database pool and the
//! connection routine used at startup. Schema changes live in `migrations/`
//! and are applied by `main` before the server starts.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;

/// Type alias for the application database pool.
pub type AppDb = PgPool;

/// Open the application database pool described by `config`.
pub async fn connect(config: &AppConfig) -> Result<AppDb, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
}
