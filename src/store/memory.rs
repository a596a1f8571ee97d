//! In-process storage backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{check_field, Repository, StoreError};
use crate::resource::Resource;

struct Table<R> {
    rows: BTreeMap<i32, R>,
    last_id: i32,
}

/// A [`Repository`] holding rows in memory. Ids start at 1 and are never
/// reused, even after a delete.
pub struct MemoryRepository<R> {
    table: RwLock<Table<R>>,
}

impl<R> MemoryRepository<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.table.read().expect("memory store lock poisoned").rows.len()
    }
}

fn row_matches<R: Resource>(row: &R, field: &str, value: &str) -> bool {
    row.field_value(field).as_deref() == Some(value)
}

impl<R> Default for MemoryRepository<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Repository<R> for MemoryRepository<R> {
    async fn list(&self) -> Result<Vec<R>, StoreError> {
        let table = self.table.read().expect("memory store lock poisoned");
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<R>, StoreError> {
        let table = self.table.read().expect("memory store lock poisoned");
        Ok(table.rows.get(&id).cloned())
    }

    async fn list_where(&self, field: &'static str, values: &[i32]) -> Result<Vec<R>, StoreError> {
        check_field::<R>(field)?;
        let wanted: Vec<String> = values.iter().map(i32::to_string).collect();
        let table = self.table.read().expect("memory store lock poisoned");
        Ok(table
            .rows
            .values()
            .filter(|row| wanted.iter().any(|value| row_matches(*row, field, value)))
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: R::Draft) -> Result<R, StoreError> {
        let mut table = self.table.write().expect("memory store lock poisoned");
        table.last_id += 1;
        let id = table.last_id;
        let row = R::from_draft(id, draft);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i32, draft: R::Draft) -> Result<Option<R>, StoreError> {
        let mut table = self.table.write().expect("memory store lock poisoned");
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = R::from_draft(id, draft);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut table = self.table.write().expect("memory store lock poisoned");
        Ok(table.rows.remove(&id).is_some())
    }

    async fn delete_where(&self, field: &'static str, value: i32) -> Result<u64, StoreError> {
        check_field::<R>(field)?;
        let value = value.to_string();
        let mut table = self.table.write().expect("memory store lock poisoned");
        let before = table.rows.len();
        table.rows.retain(|_, row| !row_matches(row, field, &value));
        Ok((before - table.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Blog, BlogDraft, Comment, CommentDraft};

    fn draft(title: &str) -> BlogDraft {
        BlogDraft {
            title: title.to_string(),
            content: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let repo = MemoryRepository::<Blog>::new();
        let first = repo.insert(draft("one")).await.unwrap();
        let second = repo.insert(draft("one")).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.len(), 2, "identical payloads create distinct rows");
    }

    #[tokio::test]
    async fn list_is_in_primary_key_order() {
        let repo = MemoryRepository::<Blog>::new();
        for title in ["c", "a", "b"] {
            repo.insert(draft(title)).await.unwrap();
        }
        let titles: Vec<String> = repo.list().await.unwrap().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows_change_nothing() {
        let repo = MemoryRepository::<Blog>::new();
        let kept = repo.insert(draft("kept")).await.unwrap();

        assert!(repo.update(99, draft("other")).await.unwrap().is_none());
        assert!(!repo.delete(99).await.unwrap());
        assert_eq!(repo.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = MemoryRepository::<Blog>::new();
        let first = repo.insert(draft("a")).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());

        let next = repo.insert(draft("b")).await.unwrap();
        assert_eq!(next.id, 2);
        assert!(repo.get(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_id() {
        let repo = MemoryRepository::<Blog>::new();
        let blog = repo.insert(draft("before")).await.unwrap();
        let updated = repo.update(blog.id, draft("after")).await.unwrap().unwrap();
        assert_eq!(updated.id, blog.id);
        assert_eq!(updated.title, "after");
        assert_eq!(repo.get(blog.id).await.unwrap(), Some(updated));
    }

    fn comment(blog: i32, text: &str) -> CommentDraft {
        CommentDraft {
            blog,
            comment: text.to_string(),
        }
    }

    #[tokio::test]
    async fn list_where_selects_rows_referencing_any_value() {
        let repo = MemoryRepository::<Comment>::new();
        repo.insert(comment(1, "a")).await.unwrap();
        repo.insert(comment(2, "b")).await.unwrap();
        repo.insert(comment(3, "c")).await.unwrap();
        repo.insert(comment(1, "d")).await.unwrap();

        let texts: Vec<String> = repo
            .list_where("blog", &[3, 1])
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.comment)
            .collect();
        assert_eq!(texts, vec!["a", "c", "d"]);
        assert!(repo.list_where("blog", &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_where_removes_only_matching_rows() {
        let repo = MemoryRepository::<Comment>::new();
        repo.insert(comment(1, "a")).await.unwrap();
        let other = repo.insert(comment(2, "b")).await.unwrap();
        repo.insert(comment(1, "c")).await.unwrap();

        assert_eq!(repo.delete_where("blog", 1).await.unwrap(), 2);
        assert_eq!(repo.delete_where("blog", 1).await.unwrap(), 0);
        assert_eq!(repo.list().await.unwrap(), vec![other]);
    }

    #[tokio::test]
    async fn unknown_fields_are_rejected() {
        let repo = MemoryRepository::<Comment>::new();
        repo.insert(comment(1, "a")).await.unwrap();

        let err = repo.delete_where("comment", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownField { field: "comment", .. }));
        assert_eq!(repo.len(), 1);
    }
}
