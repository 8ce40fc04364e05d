//! Shopping cart service.
//!
//! Every operation takes the caller's user id explicitly; nothing is read
//! from ambient request state.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::Cart;
use crate::errors::{AppError, AppResult};
use crate::infra::{BookRepository, CartRepository};

/// Shopping cart service trait for dependency injection.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Load the user's cart. It is provisioned at registration, so a
    /// missing cart is an anomaly and fails NotFound.
    async fn get_cart(&self, user_id: Uuid) -> AppResult<Cart>;

    /// Add a book to the cart. A book already in the cart gets a second
    /// line rather than a merged quantity.
    async fn add_item(&self, user_id: Uuid, book_id: Uuid, quantity: i32) -> AppResult<Cart>;

    /// Overwrite the quantity of one of the caller's cart lines
    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Cart>;

    /// Remove one of the caller's cart lines
    async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Cart>;

    /// Create an empty cart for a new user (called once at registration)
    async fn provision_for_user(&self, user_id: Uuid) -> AppResult<Cart>;

    /// Remove every line from the caller's cart
    async fn clear(&self, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CartService.
pub struct CartManager {
    carts: Arc<dyn CartRepository>,
    books: Arc<dyn BookRepository>,
}

impl CartManager {
    /// Create new cart service instance
    pub fn new(carts: Arc<dyn CartRepository>, books: Arc<dyn BookRepository>) -> Self {
        Self { carts, books }
    }
}

#[async_trait]
impl CartService for CartManager {
    async fn get_cart(&self, user_id: Uuid) -> AppResult<Cart> {
        self.carts
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Can't find shopping cart"))
    }

    async fn add_item(&self, user_id: Uuid, book_id: Uuid, quantity: i32) -> AppResult<Cart> {
        let book = self
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Can't find book by id: {}", book_id)))?;

        let cart = self.get_cart(user_id).await?;
        self.carts.insert_item(cart.id, book.id, quantity).await?;

        self.get_cart(user_id).await
    }

    async fn update_item_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<Cart> {
        self.carts
            .update_item_quantity(item_id, user_id, quantity)
            .await?;
        self.get_cart(user_id).await
    }

    async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Cart> {
        self.carts.delete_item(item_id, user_id).await?;
        self.get_cart(user_id).await
    }

    async fn provision_for_user(&self, user_id: Uuid) -> AppResult<Cart> {
        self.carts.create_for_user(user_id).await
    }

    async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        let cart = self.get_cart(user_id).await?;
        self.carts.clear_items(cart.id).await
    }
}
