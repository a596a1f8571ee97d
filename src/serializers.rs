//! Serialization rules for the three resources: field validation, JSON
//! projection and relation handling.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::ApiError;
use crate::filters::FilterField;
use crate::models::{
    Blog, BlogDraft, BlogWithComments, Comment, CommentDraft, Employee, EmployeeDraft,
};
use crate::resource::{to_json, Resource};
use crate::state::AppState;
use crate::store::Repository;
use crate::validation::{FieldErrors, FieldReader};

pub const EMP_ID_MAX_LENGTH: usize = 20;
pub const EMP_NAME_MAX_LENGTH: usize = 50;
pub const DESIGNATION_MAX_LENGTH: usize = 50;
pub const BLOG_TITLE_MAX_LENGTH: usize = 100;

#[async_trait]
impl Resource for Employee {
    const NAME: &'static str = "employee";
    const FILTER_FIELDS: &'static [FilterField] = &[FilterField::text("designation")];
    const PAGINATED: bool = true;

    type Draft = EmployeeDraft;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: EmployeeDraft) -> Self {
        Employee {
            id,
            emp_id: draft.emp_id,
            emp_name: draft.emp_name,
            designation: draft.designation,
        }
    }

    fn validate(
        payload: &Map<String, Value>,
        current: Option<&Self>,
    ) -> Result<EmployeeDraft, FieldErrors> {
        let mut fields = FieldReader::new(payload);
        let emp_id = fields.string(
            "emp_id",
            Some(EMP_ID_MAX_LENGTH),
            current.map(|e| e.emp_id.as_str()),
        );
        let emp_name = fields.string(
            "emp_name",
            Some(EMP_NAME_MAX_LENGTH),
            current.map(|e| e.emp_name.as_str()),
        );
        let designation = fields.string(
            "designation",
            Some(DESIGNATION_MAX_LENGTH),
            current.map(|e| e.designation.as_str()),
        );

        match (emp_id, emp_name, designation) {
            (Some(emp_id), Some(emp_name), Some(designation)) if fields.is_valid() => {
                Ok(EmployeeDraft {
                    emp_id,
                    emp_name,
                    designation,
                })
            }
            _ => Err(fields.into_errors()),
        }
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "designation" => Some(self.designation.clone()),
            _ => None,
        }
    }

    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.employees
    }
}

#[async_trait]
impl Resource for Blog {
    const NAME: &'static str = "blog";

    type Draft = BlogDraft;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: BlogDraft) -> Self {
        Blog {
            id,
            title: draft.title,
            content: draft.content,
        }
    }

    fn validate(payload: &Map<String, Value>, current: Option<&Self>) -> Result<BlogDraft, FieldErrors> {
        let mut fields = FieldReader::new(payload);
        let title = fields.string(
            "title",
            Some(BLOG_TITLE_MAX_LENGTH),
            current.map(|b| b.title.as_str()),
        );
        let content = fields.string("content", None, current.map(|b| b.content.as_str()));

        match (title, content) {
            (Some(title), Some(content)) if fields.is_valid() => Ok(BlogDraft { title, content }),
            _ => Err(fields.into_errors()),
        }
    }

    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.blogs
    }

    /// Blogs are rendered with their comments nested, oldest first.
    async fn represent(rows: Vec<Self>, state: &AppState) -> Result<Vec<Value>, ApiError> {
        let ids: Vec<i32> = rows.iter().map(|blog| blog.id).collect();
        let comments = state.comments.list_where("blog", &ids).await?;
        let mut by_blog: HashMap<i32, Vec<&Comment>> = HashMap::new();
        for comment in &comments {
            by_blog.entry(comment.blog).or_default().push(comment);
        }

        Ok(rows
            .iter()
            .map(|blog| {
                to_json(&BlogWithComments {
                    blog,
                    comments: by_blog.remove(&blog.id).unwrap_or_default(),
                })
            })
            .collect())
    }

    /// Deleting a blog deletes its comments.
    async fn before_delete(&self, state: &AppState) -> Result<(), ApiError> {
        let removed = state.comments.delete_where("blog", self.id).await?;
        if removed > 0 {
            info!("Deleted {} comments of blog {}", removed, self.id);
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for Comment {
    const NAME: &'static str = "comment";
    const FILTER_FIELDS: &'static [FilterField] = &[FilterField::reference("blog")];

    type Draft = CommentDraft;

    fn id(&self) -> i32 {
        self.id
    }

    fn from_draft(id: i32, draft: CommentDraft) -> Self {
        Comment {
            id,
            blog: draft.blog,
            comment: draft.comment,
        }
    }

    fn validate(
        payload: &Map<String, Value>,
        current: Option<&Self>,
    ) -> Result<CommentDraft, FieldErrors> {
        let mut fields = FieldReader::new(payload);
        let blog = fields.pk("blog", current.map(|c| c.blog));
        let comment = fields.string("comment", None, current.map(|c| c.comment.as_str()));

        match (blog, comment) {
            (Some(blog), Some(comment)) if fields.is_valid() => Ok(CommentDraft { blog, comment }),
            _ => Err(fields.into_errors()),
        }
    }

    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "blog" => Some(self.blog.to_string()),
            _ => None,
        }
    }

    fn repository(state: &AppState) -> &Arc<dyn Repository<Self>> {
        &state.comments
    }

    async fn check_relations(draft: &CommentDraft, state: &AppState) -> Result<(), ApiError> {
        if state.blogs.get(draft.blog).await?.is_none() {
            return Err(FieldErrors::single(
                "blog",
                format!("Invalid pk \"{}\" - object does not exist.", draft.blog),
            )
            .into());
        }
        Ok(())
    }
}
