//! Shopping cart repository.
//!
//! Item lookups are always scoped to the owning user's cart: an item id
//! alone is not sufficient authorization, and cross-tenant access fails
//! as NotFound so the existence of another user's item is never revealed.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use super::entities::{book, cart_item, shopping_cart};
use crate::domain::{Cart, CartItem};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Shopping cart repository trait for dependency injection.
///
/// Cart reads exclude logically deleted carts and return the cart fully
/// materialized (every line joined with its book) in one explicit pass.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Load a user's cart with all items and their books
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Cart>>;

    /// Create an empty cart for a user (once, at registration)
    async fn create_for_user(&self, user_id: Uuid) -> AppResult<Cart>;

    /// Append a line item to a cart. A book already in the cart gets a
    /// second line rather than a merged quantity.
    async fn insert_item(&self, cart_id: Uuid, book_id: Uuid, quantity: i32) -> AppResult<()>;

    /// Overwrite the quantity of a line owned by the given user
    async fn update_item_quantity(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> AppResult<()>;

    /// Delete a line owned by the given user
    async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Remove every line from a cart
    async fn clear_items(&self, cart_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CartRepository
pub struct CartStore {
    db: DatabaseConnection,
}

impl CartStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a cart item by id, scoped to the owning user's active cart.
    async fn find_scoped_item(
        &self,
        item_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<cart_item::Model>> {
        let item = cart_item::Entity::find_by_id(item_id)
            .join(JoinType::InnerJoin, cart_item::Relation::ShoppingCart.def())
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(item)
    }
}

#[async_trait]
impl CartRepository for CartStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Cart>> {
        let Some(cart) = shopping_cart::Entity::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .filter(shopping_cart::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let rows = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart.id))
            .find_also_related(book::Entity)
            .order_by_asc(cart_item::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for (item, book) in rows {
            let book = book.ok_or_else(|| {
                AppError::internal(format!("Cart item {} references a missing book", item.id))
            })?;
            items.push(CartItem {
                id: item.id,
                book_id: book.id,
                book_title: book.title,
                unit_price: book.price,
                quantity: item.quantity,
            });
        }

        Ok(Some(Cart {
            id: cart.id,
            user_id: cart.user_id,
            items,
        }))
    }

    async fn create_for_user(&self, user_id: Uuid) -> AppResult<Cart> {
        let model = shopping_cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            is_deleted: Set(false),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Cart {
            id: model.id,
            user_id: model.user_id,
            items: Vec::new(),
        })
    }

    async fn insert_item(&self, cart_id: Uuid, book_id: Uuid, quantity: i32) -> AppResult<()> {
        cart_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            cart_id: Set(cart_id),
            book_id: Set(book_id),
            quantity: Set(quantity),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }

    async fn update_item_quantity(
        &self,
        item_id: Uuid,
        user_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        let item = self
            .find_scoped_item(item_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Can't find cart item by id: {}", item_id))
            })?;

        let mut active: cart_item::ActiveModel = item.into();
        active.quantity = Set(quantity);
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete_item(&self, item_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let item = self
            .find_scoped_item(item_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Can't find cart item by id: {}", item_id))
            })?;

        cart_item::Entity::delete_by_id(item.id).exec(&self.db).await?;
        Ok(())
    }

    async fn clear_items(&self, cart_id: Uuid) -> AppResult<()> {
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(cart_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
