//! # Resource API Library
//!
//! Exposes the Axum router and modules so integration tests can create
//! an in-process server without requiring `cargo run` in another terminal.

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod resource;
pub mod router;
pub mod routes;
pub mod serializers;
pub mod state;
pub mod store;
pub mod validation;

use axum::{Extension, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::models::Employee;
use crate::router::ResourceRouter;
use crate::state::AppState;

/// Build the Axum router with all route modules and middleware.
///
/// Employees are registered on the [`ResourceRouter`], which derives their
/// five CRUD routes and the API root; blogs and comments use explicit paths.
/// The caller provides the storage through `state` and starts the server.
pub fn create_app(state: AppState) -> Router {
    let resources = ResourceRouter::new().register::<Employee>("employees");

    Router::new()
        .merge(resources.into_router())
        .merge(routes::blogs::router())
        .merge(routes::comments::router())
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
