//! Category repository with soft delete support.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::category;
use crate::domain::{Category, NewCategory};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category repository trait for dependency injection.
///
/// Read methods exclude soft-deleted categories. Deleting a category does
/// not cascade to books: stale association rows are replaced only when a
/// book is next saved.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Find an active category by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// One page of categories, ordered by name
    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<Category>, u64)>;

    /// Create a category
    async fn insert(&self, category: NewCategory) -> AppResult<Category>;

    /// Overwrite a category's mutable fields
    async fn update(&self, id: Uuid, category: NewCategory) -> AppResult<Category>;

    /// Soft delete a category by id
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CategoryRepository
pub struct CategoryStore {
    db: DatabaseConnection,
}

impl CategoryStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for CategoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let result = category::Entity::find_by_id(id)
            .filter(category::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(Category::from))
    }

    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<Category>, u64)> {
        let paginator = category::Entity::find()
            .filter(category::Column::IsDeleted.eq(false))
            .order_by_asc(category::Column::Name)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let categories = paginator
            .fetch_page(page.page_index())
            .await?
            .into_iter()
            .map(Category::from)
            .collect();

        Ok((categories, total))
    }

    async fn insert(&self, payload: NewCategory) -> AppResult<Category> {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(payload.name),
            description: Set(payload.description),
            is_deleted: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Category::from(model))
    }

    async fn update(&self, id: Uuid, payload: NewCategory) -> AppResult<Category> {
        let existing = category::Entity::find_by_id(id)
            .filter(category::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find category by id: {}", id)))?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(payload.name);
        active.description = Set(payload.description);
        let model = active.update(&self.db).await?;

        Ok(Category::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let existing = category::Entity::find_by_id(id)
            .filter(category::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find category by id: {}", id)))?;

        let mut active: category::ActiveModel = existing.into();
        active.is_deleted = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }
}
