//! Order service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use rust_decimal::Decimal;
use uuid::Uuid;

use bookstore_api::domain::{Cart, CartItem, NewOrder, Order, OrderItem, OrderStatus};
use bookstore_api::errors::AppError;
use bookstore_api::infra::{MockCartRepository, MockOrderRepository};
use bookstore_api::services::{OrderManager, OrderService};

fn make_cart(user_id: Uuid, items: Vec<CartItem>) -> Cart {
    Cart {
        id: Uuid::new_v4(),
        user_id,
        items,
    }
}

fn make_line(book_id: Uuid, quantity: i32, unit_price: Decimal) -> CartItem {
    CartItem {
        id: Uuid::new_v4(),
        book_id,
        book_title: "Dune".to_string(),
        unit_price,
        quantity,
    }
}

fn order_from_draft(draft: &NewOrder) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id: draft.user_id,
        shipping_address: draft.shipping_address.clone(),
        total: draft.total,
        status: draft.status,
        order_date: Utc::now(),
        items: draft
            .items
            .iter()
            .map(|line| OrderItem {
                id: Uuid::new_v4(),
                book_id: line.book_id,
                quantity: line.quantity,
                price: line.price,
            })
            .collect(),
    }
}

fn service(orders: MockOrderRepository, carts: MockCartRepository) -> OrderManager {
    OrderManager::new(Arc::new(orders), Arc::new(carts))
}

#[tokio::test]
async fn checkout_with_an_empty_cart_creates_no_order() {
    let user_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts
        .expect_find_by_user()
        .returning(move |user_id| Ok(Some(make_cart(user_id, vec![]))));

    let mut orders = MockOrderRepository::new();
    orders.expect_create().never();

    let err = service(orders, carts)
        .place_order(user_id, "221B Baker Street".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
}

#[tokio::test]
async fn checkout_freezes_line_prices_and_clears_the_cart() {
    let user_id = Uuid::new_v4();
    let book_id = Uuid::new_v4();
    // bookX qty 2 @ $5.00
    let cart = make_cart(user_id, vec![make_line(book_id, 2, Decimal::new(500, 2))]);
    let cart_id = cart.id;

    let mut carts = MockCartRepository::new();
    let loaded = cart.clone();
    carts
        .expect_find_by_user()
        .returning(move |_| Ok(Some(loaded.clone())));

    let mut orders = MockOrderRepository::new();
    orders
        .expect_create()
        .withf(move |draft| {
            draft.cart_id == cart_id
                && draft.status == OrderStatus::Pending
                && draft.total == Decimal::new(1000, 2)
                && draft.items.len() == 1
                && draft.items[0].price == Decimal::new(1000, 2)
                && draft.items[0].quantity == 2
        })
        .times(1)
        .returning(|draft| Ok(order_from_draft(&draft)));

    let order = service(orders, carts)
        .place_order(user_id, "221B Baker Street".to_string())
        .await
        .unwrap();

    assert_eq!(order.total, Decimal::new(1000, 2));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].price, Decimal::new(1000, 2));
}

#[tokio::test]
async fn order_items_of_a_foreign_order_fail_not_found() {
    let user_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_by_id_and_user()
        .with(eq(order_id), eq(user_id))
        .returning(|_, _| Ok(None));

    let err = service(orders, MockCartRepository::new())
        .get_order_items(user_id, order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains(&order_id.to_string()));
}

#[tokio::test]
async fn missing_order_item_id_fails_not_found() {
    let user_id = Uuid::new_v4();
    let order_id = Uuid::new_v4();
    let missing_item_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders.expect_find_by_id_and_user().returning(|order_id, user_id| {
        Ok(Some(Order {
            id: order_id,
            user_id,
            shipping_address: "somewhere".to_string(),
            total: Decimal::new(1000, 2),
            status: OrderStatus::Pending,
            order_date: Utc::now(),
            items: vec![OrderItem {
                id: Uuid::new_v4(),
                book_id: Uuid::new_v4(),
                quantity: 2,
                price: Decimal::new(1000, 2),
            }],
        }))
    });

    let err = service(orders, MockCartRepository::new())
        .get_order_item(user_id, order_id, missing_item_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains(&missing_item_id.to_string()));
}

#[tokio::test]
async fn status_update_accepts_any_recognized_status() {
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_update_status()
        .with(eq(order_id), eq(OrderStatus::Completed))
        .times(1)
        .returning(|order_id, status| {
            Ok(Order {
                id: order_id,
                user_id: Uuid::new_v4(),
                shipping_address: "somewhere".to_string(),
                total: Decimal::new(1000, 2),
                status,
                order_date: Utc::now(),
                items: vec![],
            })
        });

    let order = service(orders, MockCartRepository::new())
        .update_order_status(order_id, "completed")
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[tokio::test]
async fn unrecognized_status_text_never_touches_the_store() {
    let order_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders.expect_update_status().never();

    let err = service(orders, MockCartRepository::new())
        .update_order_status(order_id, "bogus")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidStatus(text) if text == "bogus"));
}

#[tokio::test]
async fn history_is_paginated_by_the_repository() {
    let user_id = Uuid::new_v4();

    let mut orders = MockOrderRepository::new();
    orders
        .expect_list_by_user()
        .withf(move |id, _| *id == user_id)
        .returning(|user_id, _| {
            Ok((
                vec![Order {
                    id: Uuid::new_v4(),
                    user_id,
                    shipping_address: "somewhere".to_string(),
                    total: Decimal::new(1000, 2),
                    status: OrderStatus::Delivered,
                    order_date: Utc::now(),
                    items: vec![],
                }],
                1,
            ))
        });

    let (history, total) = service(orders, MockCartRepository::new())
        .get_orders_history(user_id, &Default::default())
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(total, 1);
}
