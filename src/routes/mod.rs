//! HTTP route modules for the resource API.
//!
//! - `generic`: CRUD handlers shared by every resource
//! - `blogs`: explicit collection/item paths for blogs
//! - `comments`: explicit collection/item paths for comments
//!
//! Employees are not listed here; they are registered on the
//! [`ResourceRouter`](crate::router::ResourceRouter), which derives their routes.

pub mod blogs;
pub mod comments;
pub mod generic;
