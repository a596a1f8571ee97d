//! Domain models for the resource API.
//!
//! These structs map to the tables in the application database. Each model
//! has a storage-assigned integer `id`; the matching `*Draft` struct carries
//! the writable fields after validation and is what the repositories persist.

use serde::{Deserialize, Serialize};

// ============================================================================
// Database Models (sqlx::FromRow)
// ============================================================================

/// An employee record, filterable by `designation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i32,
    pub emp_id: String,
    pub emp_name: String,
    pub designation: String,
}

/// A blog article. Its comments are attached at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub content: String,
}

/// A comment on a blog. `blog` holds the parent blog's primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i32,
    pub blog: i32,
    pub comment: String,
}

// ============================================================================
// Validated Input (what a create/update writes)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub emp_id: String,
    pub emp_name: String,
    pub designation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentDraft {
    pub blog: i32,
    pub comment: String,
}

// ============================================================================
// Response Models
// ============================================================================

/// Wire form of a blog: the stored fields followed by its comments.
#[derive(Debug, Serialize)]
pub struct BlogWithComments<'a> {
    #[serde(flatten)]
    pub blog: &'a Blog,
    pub comments: Vec<&'a Comment>,
}
