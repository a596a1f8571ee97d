//! Comment routes.
//!
//! GET/POST              /comments/      - list comments (`?blog=<id>`) / create a comment
//! GET/PUT/PATCH/DELETE  /comments/{id}/ - retrieve / update / delete a comment

use axum::Router;

use crate::models::Comment;
use crate::routes::generic::{list_create, retrieve_update_destroy};

/// Build the comments router.
pub fn router() -> Router {
    Router::new()
        .route("/comments/", list_create::<Comment>())
        .route("/comments/{id}/", retrieve_update_destroy::<Comment>())
}
