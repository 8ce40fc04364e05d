//! Order service - checkout, history, and administrative status updates.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::infra::{CartRepository, OrderRepository};
use crate::types::PaginationParams;

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// Convert the caller's cart into an order. Fails EmptyCart when the
    /// cart has no items; on success the cart is left empty.
    async fn place_order(&self, user_id: Uuid, shipping_address: String) -> AppResult<Order>;

    /// One page of the caller's order history, newest first
    async fn get_orders_history(
        &self,
        user_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)>;

    /// Items of one of the caller's orders
    async fn get_order_items(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Vec<OrderItem>>;

    /// One item of one of the caller's orders
    async fn get_order_item(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<OrderItem>;

    /// Overwrite an order's status (administrative). Unrecognized status
    /// text fails InvalidStatus before the order is even looked up.
    async fn update_order_status(&self, order_id: Uuid, status_text: &str) -> AppResult<Order>;
}

/// Concrete implementation of OrderService.
pub struct OrderManager {
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
}

impl OrderManager {
    /// Create new order service instance
    pub fn new(orders: Arc<dyn OrderRepository>, carts: Arc<dyn CartRepository>) -> Self {
        Self { orders, carts }
    }
}

#[async_trait]
impl OrderService for OrderManager {
    async fn place_order(&self, user_id: Uuid, shipping_address: String) -> AppResult<Order> {
        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Can't find shopping cart"))?;

        if cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        // Freeze every line's price at checkout time
        let items: Vec<NewOrderItem> = cart
            .items
            .iter()
            .map(|line| NewOrderItem {
                book_id: line.book_id,
                quantity: line.quantity,
                price: line.unit_price * Decimal::from(line.quantity),
            })
            .collect();
        let total: Decimal = items.iter().map(|item| item.price).sum();

        self.orders
            .create(NewOrder {
                user_id,
                cart_id: cart.id,
                shipping_address,
                total,
                status: OrderStatus::Pending,
                items,
            })
            .await
    }

    async fn get_orders_history(
        &self,
        user_id: Uuid,
        page: &PaginationParams,
    ) -> AppResult<(Vec<Order>, u64)> {
        self.orders.list_by_user(user_id, page).await
    }

    async fn get_order_items(&self, user_id: Uuid, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
        let order = self
            .orders
            .find_by_id_and_user(order_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find order by id: {}", order_id)))?;

        Ok(order.items)
    }

    async fn get_order_item(
        &self,
        user_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
    ) -> AppResult<OrderItem> {
        self.get_order_items(user_id, order_id)
            .await?
            .into_iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| {
                AppError::not_found(format!("Can't find order item by id: {}", item_id))
            })
    }

    async fn update_order_status(&self, order_id: Uuid, status_text: &str) -> AppResult<Order> {
        let status = OrderStatus::parse(status_text)?;
        self.orders.update_status(order_id, status).await
    }
}
