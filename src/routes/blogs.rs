//! Blog routes.
//!
//! GET/POST              /blogs/      - list blogs (comments nested) / create a blog
//! GET/PUT/PATCH/DELETE  /blogs/{id}/ - retrieve / update / delete a blog and its comments

use axum::Router;

use crate::models::Blog;
use crate::routes::generic::{list_create, retrieve_update_destroy};

/// Build the blogs router.
pub fn router() -> Router {
    Router::new()
        .route("/blogs/", list_create::<Blog>())
        .route("/blogs/{id}/", retrieve_update_destroy::<Blog>())
}
