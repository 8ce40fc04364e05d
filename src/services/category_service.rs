//! Category service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Category, NewCategory};
use crate::errors::{AppError, AppResult};
use crate::infra::CategoryRepository;
use crate::types::PaginationParams;

/// Category service trait for dependency injection.
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// One page of categories
    async fn find_all(&self, page: &PaginationParams) -> AppResult<(Vec<Category>, u64)>;

    /// Get a category by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Category>;

    /// Create a new category
    async fn save(&self, payload: NewCategory) -> AppResult<Category>;

    /// Overwrite a category's mutable fields
    async fn update(&self, id: Uuid, payload: NewCategory) -> AppResult<Category>;

    /// Delete a category. Books keep their association until next saved.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CategoryService.
pub struct CategoryManager {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryManager {
    /// Create new category service instance
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn find_all(&self, page: &PaginationParams) -> AppResult<(Vec<Category>, u64)> {
        self.repo.list(page).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Category> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find category by id: {}", id)))
    }

    async fn save(&self, payload: NewCategory) -> AppResult<Category> {
        self.repo.insert(payload).await
    }

    async fn update(&self, id: Uuid, payload: NewCategory) -> AppResult<Category> {
        self.repo.update(id, payload).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await
    }
}
