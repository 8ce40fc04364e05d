//! Book repository with soft delete and catalog search support.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{book, book_category};
use crate::domain::{Book, NewBook};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Book repository trait for dependency injection.
///
/// All read methods exclude soft-deleted books and return books with
/// their category membership already materialized.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find an active book by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;

    /// One page of the catalog, ordered by title
    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<Book>, u64)>;

    /// One page of the catalog narrowed by a search condition
    async fn search(
        &self,
        condition: Condition,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)>;

    /// One page of the books linked to a category
    async fn list_by_category(
        &self,
        category_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)>;

    /// Create a book together with its category links
    async fn insert(&self, book: NewBook) -> AppResult<Book>;

    /// Overwrite every mutable field of a book, replacing its category links
    async fn update(&self, id: Uuid, book: NewBook) -> AppResult<Book>;

    /// Soft delete a book by id
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of BookRepository
pub struct BookStore {
    db: DatabaseConnection,
}

impl BookStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load category links for a set of books in one query.
    async fn load_category_ids(&self, book_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<Uuid>>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = book_category::Entity::find()
            .filter(book_category::Column::BookId.is_in(book_ids.to_vec()))
            .all(&self.db)
            .await?;

        let mut by_book: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            by_book.entry(link.book_id).or_default().push(link.category_id);
        }
        Ok(by_book)
    }

    async fn assemble_page(
        &self,
        models: Vec<book::Model>,
        total: u64,
    ) -> AppResult<(Vec<Book>, u64)> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut links = self.load_category_ids(&ids).await?;
        let books = models
            .into_iter()
            .map(|m| {
                let category_ids = links.remove(&m.id).unwrap_or_default();
                m.into_domain(category_ids)
            })
            .collect();
        Ok((books, total))
    }

    async fn insert_in_txn(txn: &DatabaseTransaction, payload: NewBook) -> AppResult<Book> {
        let NewBook {
            title,
            author,
            isbn,
            price,
            description,
            cover_image,
            category_ids,
        } = payload;

        let now = Utc::now();
        let model = book::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title),
            author: Set(author),
            isbn: Set(isbn),
            price: Set(price),
            description: Set(description),
            cover_image: Set(cover_image),
            is_deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        for category_id in &category_ids {
            book_category::ActiveModel {
                book_id: Set(model.id),
                category_id: Set(*category_id),
            }
            .insert(txn)
            .await?;
        }

        Ok(model.into_domain(category_ids))
    }

    async fn update_in_txn(
        txn: &DatabaseTransaction,
        id: Uuid,
        payload: NewBook,
    ) -> AppResult<Book> {
        let existing = book::Entity::find_by_id(id)
            .filter(book::Column::IsDeleted.eq(false))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find book by id: {}", id)))?;

        let NewBook {
            title,
            author,
            isbn,
            price,
            description,
            cover_image,
            category_ids,
        } = payload;

        let mut active: book::ActiveModel = existing.into();
        active.title = Set(title);
        active.author = Set(author);
        active.isbn = Set(isbn);
        active.price = Set(price);
        active.description = Set(description);
        active.cover_image = Set(cover_image);
        active.updated_at = Set(Utc::now());
        let model = active.update(txn).await?;

        // Category membership is a value set: replace the links wholesale
        book_category::Entity::delete_many()
            .filter(book_category::Column::BookId.eq(id))
            .exec(txn)
            .await?;
        for category_id in &category_ids {
            book_category::ActiveModel {
                book_id: Set(model.id),
                category_id: Set(*category_id),
            }
            .insert(txn)
            .await?;
        }

        Ok(model.into_domain(category_ids))
    }
}

#[async_trait]
impl BookRepository for BookStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let Some(model) = book::Entity::find_by_id(id)
            .filter(book::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut links = self.load_category_ids(&[model.id]).await?;
        let category_ids = links.remove(&model.id).unwrap_or_default();
        Ok(Some(model.into_domain(category_ids)))
    }

    async fn list(&self, page: &PaginationParams) -> AppResult<(Vec<Book>, u64)> {
        let paginator = book::Entity::find()
            .filter(book::Column::IsDeleted.eq(false))
            .order_by_asc(book::Column::Title)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;
        self.assemble_page(models, total).await
    }

    async fn search(
        &self,
        condition: Condition,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        let paginator = book::Entity::find()
            .filter(book::Column::IsDeleted.eq(false))
            .filter(condition)
            .order_by_asc(book::Column::Title)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;
        self.assemble_page(models, total).await
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Book>, u64)> {
        let linked_book_ids = Query::select()
            .column(book_category::Column::BookId)
            .from(book_category::Entity)
            .and_where(book_category::Column::CategoryId.eq(category_id))
            .to_owned();

        let paginator = book::Entity::find()
            .filter(book::Column::IsDeleted.eq(false))
            .filter(book::Column::Id.in_subquery(linked_book_ids))
            .order_by_asc(book::Column::Title)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;
        self.assemble_page(models, total).await
    }

    async fn insert(&self, payload: NewBook) -> AppResult<Book> {
        let txn = self.db.begin().await?;
        match Self::insert_in_txn(&txn, payload).await {
            Ok(book) => {
                txn.commit().await?;
                Ok(book)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn update(&self, id: Uuid, payload: NewBook) -> AppResult<Book> {
        let txn = self.db.begin().await?;
        match Self::update_in_txn(&txn, id, payload).await {
            Ok(book) => {
                txn.commit().await?;
                Ok(book)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let existing = book::Entity::find_by_id(id)
            .filter(book::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find book by id: {}", id)))?;

        let mut active: book::ActiveModel = existing.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }
}
