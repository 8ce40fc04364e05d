//! Order repository.
//!
//! Placing an order is a single transaction: the order row, its items,
//! and the emptying of the source cart commit together or not at all.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{cart_item, order, order_item};
use crate::domain::{NewOrder, Order, OrderItem, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Order repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a draft order with its items and clear the source cart,
    /// all inside one transaction
    async fn create(&self, order: NewOrder) -> AppResult<Order>;

    /// One page of a user's orders, newest first, items included
    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Load an order with items, scoped to its owner
    async fn find_by_id_and_user(&self, order_id: Uuid, user_id: Uuid)
        -> AppResult<Option<Order>>;

    /// Overwrite an order's status (administrative)
    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order>;
}

/// Concrete implementation of OrderRepository
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn create_in_txn(txn: &DatabaseTransaction, draft: NewOrder) -> AppResult<Order> {
        let model = order::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(draft.user_id),
            shipping_address: Set(draft.shipping_address),
            total: Set(draft.total),
            status: Set(draft.status.as_str().to_string()),
            order_date: Set(Utc::now()),
        }
        .insert(txn)
        .await?;

        let mut items = Vec::with_capacity(draft.items.len());
        for line in draft.items {
            let item = order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(model.id),
                book_id: Set(line.book_id),
                quantity: Set(line.quantity),
                price: Set(line.price),
            }
            .insert(txn)
            .await?;
            items.push(OrderItem::from(item));
        }

        // The cart is emptied in the same transaction as the order insert
        cart_item::Entity::delete_many()
            .filter(cart_item::Column::CartId.eq(draft.cart_id))
            .exec(txn)
            .await?;

        model.into_domain(items)
    }

    async fn load_items(&self, order_ids: &[Uuid]) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids.to_vec()))
            .all(&self.db)
            .await?;

        let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderItem::from(row));
        }
        Ok(by_order)
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(&self, draft: NewOrder) -> AppResult<Order> {
        let txn = self.db.begin().await?;
        match Self::create_in_txn(&txn, draft).await {
            Ok(order) => {
                txn.commit().await?;
                Ok(order)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        let paginator = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::OrderDate)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut items = self.load_items(&ids).await?;

        let orders = models
            .into_iter()
            .map(|m| {
                let order_items = items.remove(&m.id).unwrap_or_default();
                m.into_domain(order_items)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok((orders, total))
    }

    async fn find_by_id_and_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Order>> {
        let Some(model) = order::Entity::find_by_id(order_id)
            .filter(order::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut items = self.load_items(&[model.id]).await?;
        let order_items = items.remove(&model.id).unwrap_or_default();
        Ok(Some(model.into_domain(order_items)?))
    }

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let existing = order::Entity::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find order by id: {}", order_id)))?;

        let mut active: order::ActiveModel = existing.into();
        active.status = Set(status.as_str().to_string());
        let model = active.update(&self.db).await?;

        let mut items = self.load_items(&[model.id]).await?;
        let order_items = items.remove(&model.id).unwrap_or_default();
        model.into_domain(order_items)
    }
}
