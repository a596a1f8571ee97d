//! Shared application state handed to every route through an `Extension`.

use std::sync::Arc;

use crate::db::AppDb;
use crate::models::{Blog, Comment, Employee};
use crate::pagination::PageNumberPagination;
use crate::store::{MemoryRepository, PgRepository, Repository};

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn Repository<Employee>>,
    pub blogs: Arc<dyn Repository<Blog>>,
    pub comments: Arc<dyn Repository<Comment>>,
    pub pagination: PageNumberPagination,
}

impl AppState {
    /// State backed by the application database.
    pub fn postgres(pool: AppDb, pagination: PageNumberPagination) -> Self {
        Self {
            employees: Arc::new(PgRepository::<Employee>::new(pool.clone())),
            blogs: Arc::new(PgRepository::<Blog>::new(pool.clone())),
            comments: Arc::new(PgRepository::<Comment>::new(pool)),
            pagination,
        }
    }

    /// State backed by in-process maps; nothing survives a restart.
    pub fn in_memory(pagination: PageNumberPagination) -> Self {
        Self {
            employees: Arc::new(MemoryRepository::<Employee>::new()),
            blogs: Arc::new(MemoryRepository::<Blog>::new()),
            comments: Arc::new(MemoryRepository::<Comment>::new()),
            pagination,
        }
    }
}
