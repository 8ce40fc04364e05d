//! Order domain entities, status state machine, and DTOs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Order lifecycle status. Administrative transitions only move forward:
/// PENDING -> COMPLETED -> DELIVERED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Delivered,
}

impl OrderStatus {
    /// Parse a status from client-supplied text, case-insensitively.
    ///
    /// Unrecognized text fails with `InvalidStatus`, never `NotFound`.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "COMPLETED" => Ok(OrderStatus::Completed),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            _ => Err(AppError::InvalidStatus(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order domain entity with its items materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One order line with the price frozen at checkout time.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    /// Line total (unit price x quantity) snapshotted when the order was
    /// placed; never re-derived from the catalog.
    pub price: Decimal,
}

/// Draft of an order to persist. The store inserts the order and its items
/// and clears the source cart's lines in a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub shipping_address: String,
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: Vec<NewOrderItem>,
}

/// Draft of one order line.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub book_id: Uuid,
    pub quantity: i32,
    pub price: Decimal,
}

/// Order view returned by order endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_items: Vec<OrderItemResponse>,
    pub order_date: DateTime<Utc>,
    #[schema(value_type = String, example = "39.98")]
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Order line view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub book_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            order_items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            order_date: order.order_date,
            total: order.total,
            status: order.status,
        }
    }
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            book_id: item.book_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(OrderStatus::parse("completed").unwrap(), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse("PENDING").unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("Delivered").unwrap(), OrderStatus::Delivered);
    }

    #[test]
    fn unknown_status_text_is_rejected() {
        let err = OrderStatus::parse("bogus").unwrap_err();
        assert!(matches!(err, AppError::InvalidStatus(s) if s == "bogus"));
    }

    #[test]
    fn status_round_trips_through_as_str() {
        for status in [OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Delivered] {
            assert_eq!(OrderStatus::parse(status.as_str()).unwrap(), status);
        }
    }
}
