//! # Resource API
//!
//! A standalone Axum web application exposing CRUD endpoints for employees,
//! blogs and comments.
//!
//! ## Architecture
//!
//! - Axum handles HTTP routing and the request/response lifecycle
//! - SQLx manages the application database (or an in-memory store when
//!   `APP_STORAGE=memory`)
//! - Configuration comes from the environment, optionally via `.env`

use tracing::info;

use resource_api::config::{AppConfig, StorageBackend};
use resource_api::state::AppState;
use resource_api::{create_app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "resource_api=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting resource API");

    let config = AppConfig::from_env()?;
    let pagination = config.pagination();

    let state = match config.storage {
        StorageBackend::Postgres => {
            let app_db = db::connect(&config).await?;
            info!("Connected to application database");

            sqlx::migrate!("./migrations").run(&app_db).await?;
            info!("Application migrations complete");

            AppState::postgres(app_db, pagination)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(pagination)
        }
    };

    let app = create_app(state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
