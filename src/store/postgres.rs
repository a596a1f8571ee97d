//! PostgreSQL storage through a shared `sqlx` pool.
//!
//! Tables are created by the migrations under `migrations/`. Each resource
//! describes its table and writable columns through [`PgResource`]; the
//! generic [`PgRepository`] builds the statements from that description.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use super::{check_field, Repository, StoreError};
use crate::db::AppDb;
use crate::models::{Blog, BlogDraft, Comment, CommentDraft, Employee, EmployeeDraft};
use crate::resource::Resource;

pub type PgQueryAs<'q, R> = QueryAs<'q, Postgres, R, PgArguments>;

/// Table mapping for a resource stored in PostgreSQL.
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;

    /// Writable columns, in the order [`PgResource::bind_draft`] binds them.
    const COLUMNS: &'static [&'static str];

    fn bind_draft<'q>(draft: &'q Self::Draft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

impl PgResource for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &["emp_id", "emp_name", "designation"];

    fn bind_draft<'q>(draft: &'q EmployeeDraft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&draft.emp_id)
            .bind(&draft.emp_name)
            .bind(&draft.designation)
    }
}

impl PgResource for Blog {
    const TABLE: &'static str = "blogs";
    const COLUMNS: &'static [&'static str] = &["title", "content"];

    fn bind_draft<'q>(draft: &'q BlogDraft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(&draft.title).bind(&draft.content)
    }
}

impl PgResource for Comment {
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [&'static str] = &["blog", "comment"];

    fn bind_draft<'q>(draft: &'q CommentDraft, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(draft.blog).bind(&draft.comment)
    }
}

pub struct PgRepository<R> {
    pool: AppDb,
    _resource: PhantomData<fn() -> R>,
}

impl<R> PgRepository<R> {
    pub fn new(pool: AppDb) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {table} ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        placeholders.join(", ")
    )
}

fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 1))
        .collect();
    format!(
        "UPDATE {table} SET {} WHERE id = ${} RETURNING *",
        assignments.join(", "),
        columns.len() + 1
    )
}

fn list_where_sql(table: &str, field: &str) -> String {
    format!("SELECT * FROM {table} WHERE {field} = ANY($1) ORDER BY id")
}

fn delete_where_sql(table: &str, field: &str) -> String {
    format!("DELETE FROM {table} WHERE {field} = $1")
}

#[async_trait]
impl<R: PgResource> Repository<R> for PgRepository<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", R::TABLE);
        let rows = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", R::TABLE);
        let row = sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_where(&self, field: &'static str, values: &[i32]) -> Result<Vec<R>, StoreError> {
        check_field::<R>(field)?;
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let sql = list_where_sql(R::TABLE, field);
        let rows = sqlx::query_as::<_, R>(&sql)
            .bind(values.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError> {
        let sql = insert_sql(R::TABLE, R::COLUMNS);
        let row = R::bind_draft(&draft, sqlx::query_as(&sql))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, draft: R::Draft) -> Result<Option<R>, StoreError> {
        let sql = update_sql(R::TABLE, R::COLUMNS);
        let row = R::bind_draft(&draft, sqlx::query_as(&sql))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_where(&self, field: &'static str, value: i32) -> Result<u64, StoreError> {
        check_field::<R>(field)?;
        let sql = delete_where_sql(R::TABLE, field);
        let result = sqlx::query(&sql).bind(value).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements_number_placeholders_in_column_order() {
        assert_eq!(
            insert_sql(Employee::TABLE, Employee::COLUMNS),
            "INSERT INTO employees (emp_id, emp_name, designation) VALUES ($1, $2, $3) RETURNING *"
        );
        assert_eq!(
            update_sql(Comment::TABLE, Comment::COLUMNS),
            "UPDATE comments SET blog = $1, comment = $2 WHERE id = $3 RETURNING *"
        );
    }

    #[test]
    fn reference_statements_match_a_single_column() {
        assert_eq!(
            list_where_sql(Comment::TABLE, "blog"),
            "SELECT * FROM comments WHERE blog = ANY($1) ORDER BY id"
        );
        assert_eq!(
            delete_where_sql(Comment::TABLE, "blog"),
            "DELETE FROM comments WHERE blog = $1"
        );
    }
}
