//! The contract every exposed resource type implements.
//!
//! A [`Resource`] ties together a storage collection (its repository in
//! [`AppState`]), a serialization rule (validation of incoming payloads and the
//! JSON projection of stored rows) and the fields the list endpoint may filter
//! on. The generic handlers in [`crate::routes::generic`] are written once
//! against this trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::filters::FilterField;
use crate::state::AppState;
use crate::store::Repository;
use crate::validation::FieldErrors;

#[async_trait]
pub trait Resource: Clone + Serialize + Send + Sync + Sized + 'static {
    /// Singular name used in log lines.
    const NAME: &'static str;

    /// Fields accepted as exact-match list filters.
    const FILTER_FIELDS: &'static [FilterField] = &[];

    /// Whether the list endpoint wraps its results in a page.
    const PAGINATED: bool = false;

    /// The writable fields after validation.
    type Draft: Send + Sync + 'static;

    fn id(&self) -> i32;

    /// Build a stored row from its assigned id and validated fields.
    fn from_draft(id: i32, draft: Self::Draft) -> Self;

    /// Validate a JSON object into a draft.
    ///
    /// With `current` set (partial update), absent fields keep the stored
    /// value; otherwise every writable field is required.
    fn validate(payload: &Map<String, Value>, current: Option<&Self>)
        -> Result<Self::Draft, FieldErrors>;

    /// Text form of a filterable field, compared against query values.
    fn field_value(&self, _field: &str) -> Option<String> {
        None
    }

    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>>;

    /// Checks that need other resources, run after [`Resource::validate`].
    async fn check_relations(_draft: &Self::Draft, _state: &AppState) -> Result<(), ApiError> {
        Ok(())
    }

    /// Project rows into their wire representation.
    async fn represent(rows: Vec<Self>, _state: &AppState) -> Result<Vec<Value>, ApiError> {
        Ok(rows.iter().map(to_json).collect())
    }

    /// Runs before the row is removed.
    async fn before_delete(&self, _state: &AppState) -> Result<(), ApiError> {
        Ok(())
    }
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> Value {
    // Derived Serialize on plain structs with string keys cannot fail.
    serde_json::to_value(value).unwrap_or(Value::Null)
}
