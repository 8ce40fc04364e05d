//! Shopping cart domain entity and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Fully materialized shopping cart: the cart row plus every line item
/// joined with its book. Loaded in one explicit query pass, never lazily.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One cart line: a (book, quantity) pairing.
///
/// Carries the book's current unit price so checkout can freeze line
/// totals without another catalog round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// Cart view returned by cart endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cart_items: Vec<CartItemResponse>,
}

/// Cart line view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,
    pub quantity: i32,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            id: cart.id,
            user_id: cart.user_id,
            cart_items: cart.items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            book_id: item.book_id,
            book_title: item.book_title,
            quantity: item.quantity,
        }
    }
}
