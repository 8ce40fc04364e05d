//! Book catalog service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Book, BookSearchParams, NewBook};
use crate::errors::{AppError, AppResult};
use crate::infra::{BookFilterRegistry, BookRepository};
use crate::types::PaginationParams;

/// Book catalog service trait for dependency injection.
#[async_trait]
pub trait BookService: Send + Sync {
    /// Create a new book
    async fn save(&self, payload: NewBook) -> AppResult<Book>;

    /// One page of the catalog
    async fn find_all(&self, page: &PaginationParams) -> AppResult<(Vec<Book>, u64)>;

    /// Get a book by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Book>;

    /// Overwrite every mutable field of a book (id is immutable)
    async fn update(&self, id: Uuid, payload: NewBook) -> AppResult<Book>;

    /// Delete a book by id
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Search the catalog. An all-empty request behaves like `find_all`.
    async fn search(
        &self,
        params: &BookSearchParams,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)>;

    /// One page of the books linked to a category
    async fn find_all_by_category(
        &self,
        category_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)>;
}

/// Concrete implementation of BookService.
pub struct BookManager {
    repo: Arc<dyn BookRepository>,
    filters: Arc<BookFilterRegistry>,
}

impl BookManager {
    /// Create new book service instance
    pub fn new(repo: Arc<dyn BookRepository>, filters: Arc<BookFilterRegistry>) -> Self {
        Self { repo, filters }
    }
}

#[async_trait]
impl BookService for BookManager {
    async fn save(&self, payload: NewBook) -> AppResult<Book> {
        self.repo.insert(payload).await
    }

    async fn find_all(&self, page: &PaginationParams) -> AppResult<(Vec<Book>, u64)> {
        self.repo.list(page).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Book> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find book by id: {}", id)))
    }

    async fn update(&self, id: Uuid, payload: NewBook) -> AppResult<Book> {
        self.repo.update(id, payload).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn search(
        &self,
        params: &BookSearchParams,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        let condition = self.filters.build(params)?;
        self.repo.search(condition, page).await
    }

    async fn find_all_by_category(
        &self,
        category_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        self.repo.list_by_category(category_id, page).await
    }
}
