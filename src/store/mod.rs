//! Storage backends for the resource handlers.
//!
//! Handlers talk to a [`Repository`] trait object per resource, so the same
//! routes run against PostgreSQL in production and an in-process map in
//! development and tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::filters::FilterKind;
use crate::resource::Resource;

pub use memory::MemoryRepository;
pub use postgres::{PgRepository, PgResource};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{resource} has no reference field {field:?}")]
    UnknownField {
        resource: &'static str,
        field: &'static str,
    },
}

/// Only declared reference filter fields may be matched by value; the name
/// is interpolated into SQL.
pub(crate) fn check_field<R: Resource>(field: &'static str) -> Result<(), StoreError> {
    let declared = R::FILTER_FIELDS
        .iter()
        .any(|f| f.name == field && f.kind == FilterKind::Reference);
    if declared {
        Ok(())
    } else {
        Err(StoreError::UnknownField {
            resource: R::NAME,
            field,
        })
    }
}

/// Primary-key addressed storage for one resource type.
///
/// `list` and `list_where` return rows in primary-key order. `update` and
/// `delete` report a missing row as `None` / `false` rather than an error.
/// The `*_where` methods take one of the resource's reference filter fields.
#[async_trait]
pub trait Repository<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, StoreError>;

    async fn get(&self, id: i32) -> Result<Option<R>, StoreError>;

    /// Rows whose `field` equals any of `values`.
    async fn list_where(&self, field: &'static str, values: &[i32]) -> Result<Vec<R>, StoreError>;

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError>;

    async fn update(&self, id: i32, draft: R::Draft) -> Result<Option<R>, StoreError>;

    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Delete every row whose `field` equals `value`, returning how many went.
    async fn delete_where(&self, field: &'static str, value: i32) -> Result<u64, StoreError>;
}
