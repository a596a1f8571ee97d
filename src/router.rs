//! Auto-derived routing for resources.
//!
//! Registering a resource under a prefix produces its five conventional
//! routes in one call:
//!
//! | Method | Path | Operation |
//! |---|---|---|
//! | GET | `/{prefix}/` | list |
//! | POST | `/{prefix}/` | create |
//! | GET | `/{prefix}/{id}/` | retrieve |
//! | PUT, PATCH | `/{prefix}/{id}/` | update |
//! | DELETE | `/{prefix}/{id}/` | delete |
//!
//! The finished router also serves `GET /`, listing each registered prefix
//! with the absolute URL of its collection.

use axum::extract::OriginalUri;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};

use crate::resource::Resource;
use crate::routes::generic::{list_create, request_base_url, retrieve_update_destroy};

pub struct ResourceRouter {
    routes: Router,
    prefixes: Vec<&'static str>,
}

impl ResourceRouter {
    pub fn new() -> Self {
        Self {
            routes: Router::new(),
            prefixes: Vec::new(),
        }
    }

    /// Add list/create/retrieve/update/delete routes for `R` under `prefix`.
    pub fn register<R: Resource>(mut self, prefix: &'static str) -> Self {
        let collection = format!("/{prefix}/");
        let item = format!("/{prefix}/{{id}}/");
        self.routes = self
            .routes
            .route(&collection, list_create::<R>())
            .route(&item, retrieve_update_destroy::<R>());
        self.prefixes.push(prefix);
        self
    }

    #[cfg(test)]
    fn prefixes(&self) -> &[&'static str] {
        &self.prefixes
    }

    /// Finish the router, adding the API root at `/`.
    pub fn into_router(self) -> Router {
        let prefixes = self.prefixes;
        self.routes.route(
            "/",
            get(move |headers: HeaderMap, uri: OriginalUri| {
                let prefixes = prefixes.clone();
                async move { Json(api_root(&prefixes, &request_base_url(&headers, &uri))) }
            }),
        )
    }
}

impl Default for ResourceRouter {
    fn default() -> Self {
        Self::new()
    }
}

fn api_root(prefixes: &[&'static str], base_url: &str) -> Value {
    let base = base_url.trim_end_matches('/');
    let links: Map<String, Value> = prefixes
        .iter()
        .map(|prefix| (prefix.to_string(), Value::String(format!("{base}/{prefix}/"))))
        .collect();
    Value::Object(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Blog, Employee};
    use serde_json::json;

    #[test]
    fn register_records_prefixes_in_order() {
        let router = ResourceRouter::new()
            .register::<Employee>("employees")
            .register::<Blog>("articles");
        assert_eq!(router.prefixes(), ["employees", "articles"]);
    }

    #[test]
    fn api_root_links_each_collection() {
        assert_eq!(
            api_root(&["employees"], "http://testserver/"),
            json!({ "employees": "http://testserver/employees/" })
        );
        assert_eq!(api_root(&["employees"], "/"), json!({ "employees": "/employees/" }));
    }
}
