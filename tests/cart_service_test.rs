//! Shopping cart service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;
use rust_decimal::Decimal;
use uuid::Uuid;

use bookstore_api::domain::{Book, Cart, CartItem};
use bookstore_api::errors::AppError;
use bookstore_api::infra::{MockBookRepository, MockCartRepository};
use bookstore_api::services::{CartManager, CartService};

fn make_book(id: Uuid) -> Book {
    Book {
        id,
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: "978-0441172719".to_string(),
        price: Decimal::new(500, 2),
        description: None,
        cover_image: None,
        category_ids: vec![],
    }
}

fn make_line(book_id: Uuid, quantity: i32) -> CartItem {
    CartItem {
        id: Uuid::new_v4(),
        book_id,
        book_title: "Dune".to_string(),
        unit_price: Decimal::new(500, 2),
        quantity,
    }
}

fn make_cart(user_id: Uuid, items: Vec<CartItem>) -> Cart {
    Cart {
        id: Uuid::new_v4(),
        user_id,
        items,
    }
}

fn service(carts: MockCartRepository, books: MockBookRepository) -> CartManager {
    CartManager::new(Arc::new(carts), Arc::new(books))
}

#[tokio::test]
async fn get_cart_fails_not_found_when_absent() {
    let user_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts.expect_find_by_user().returning(|_| Ok(None));

    let err = service(carts, MockBookRepository::new())
        .get_cart(user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn add_item_appends_a_line_and_returns_the_refreshed_cart() {
    let user_id = Uuid::new_v4();
    let book_id = Uuid::new_v4();
    let cart = make_cart(user_id, vec![]);
    let cart_id = cart.id;

    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .with(eq(book_id))
        .returning(move |id| Ok(Some(make_book(id))));

    let mut carts = MockCartRepository::new();
    let empty = cart.clone();
    let refreshed = Cart {
        items: vec![make_line(book_id, 2)],
        ..cart.clone()
    };
    let mut responses = vec![refreshed.clone(), empty];
    carts
        .expect_find_by_user()
        .times(2)
        .returning(move |_| Ok(responses.pop()));
    carts
        .expect_insert_item()
        .with(eq(cart_id), eq(book_id), eq(2))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let result = service(carts, books)
        .add_item(user_id, book_id, 2)
        .await
        .unwrap();
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].quantity, 2);
}

#[tokio::test]
async fn add_item_for_a_book_already_in_the_cart_appends_a_second_line() {
    let user_id = Uuid::new_v4();
    let book_id = Uuid::new_v4();
    let cart = make_cart(user_id, vec![make_line(book_id, 1)]);
    let cart_id = cart.id;

    let mut books = MockBookRepository::new();
    books
        .expect_find_by_id()
        .returning(move |id| Ok(Some(make_book(id))));

    let mut carts = MockCartRepository::new();
    let with_one = cart.clone();
    let with_two = Cart {
        items: vec![make_line(book_id, 1), make_line(book_id, 3)],
        ..cart.clone()
    };
    let mut responses = vec![with_two, with_one];
    carts
        .expect_find_by_user()
        .times(2)
        .returning(move |_| Ok(responses.pop()));
    // No merging: the same book gets a brand new line
    carts
        .expect_insert_item()
        .with(eq(cart_id), eq(book_id), eq(3))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let result = service(carts, books)
        .add_item(user_id, book_id, 3)
        .await
        .unwrap();
    assert_eq!(result.items.len(), 2);
}

#[tokio::test]
async fn add_item_fails_when_the_book_is_missing() {
    let user_id = Uuid::new_v4();
    let book_id = Uuid::new_v4();

    let mut books = MockBookRepository::new();
    books.expect_find_by_id().returning(|_| Ok(None));

    let err = service(MockCartRepository::new(), books)
        .add_item(user_id, book_id, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains(&book_id.to_string()));
}

#[tokio::test]
async fn update_quantity_of_another_users_item_fails_not_found() {
    let user_id = Uuid::new_v4();
    let foreign_item_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts
        .expect_update_item_quantity()
        .with(eq(foreign_item_id), eq(user_id), eq(5))
        .returning(|item_id, _, _| {
            Err(AppError::not_found(format!(
                "Can't find cart item by id: {}",
                item_id
            )))
        });

    let err = service(carts, MockBookRepository::new())
        .update_item_quantity(user_id, foreign_item_id, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn remove_item_returns_the_refreshed_cart() {
    let user_id = Uuid::new_v4();
    let item_id = Uuid::new_v4();
    let cart = make_cart(user_id, vec![]);

    let mut carts = MockCartRepository::new();
    carts
        .expect_delete_item()
        .with(eq(item_id), eq(user_id))
        .times(1)
        .returning(|_, _| Ok(()));
    let refreshed = cart.clone();
    carts
        .expect_find_by_user()
        .returning(move |_| Ok(Some(refreshed.clone())));

    let result = service(carts, MockBookRepository::new())
        .remove_item(user_id, item_id)
        .await
        .unwrap();
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn provision_for_user_creates_an_empty_cart() {
    let user_id = Uuid::new_v4();

    let mut carts = MockCartRepository::new();
    carts
        .expect_create_for_user()
        .with(eq(user_id))
        .returning(|user_id| {
            Ok(Cart {
                id: Uuid::new_v4(),
                user_id,
                items: vec![],
            })
        });

    let cart = service(carts, MockBookRepository::new())
        .provision_for_user(user_id)
        .await
        .unwrap();
    assert_eq!(cart.user_id, user_id);
    assert!(cart.items.is_empty());
}

#[tokio::test]
async fn clear_empties_the_users_cart() {
    let user_id = Uuid::new_v4();
    let cart = make_cart(user_id, vec![make_line(Uuid::new_v4(), 1)]);
    let cart_id = cart.id;

    let mut carts = MockCartRepository::new();
    carts
        .expect_find_by_user()
        .returning(move |_| Ok(Some(cart.clone())));
    carts
        .expect_clear_items()
        .with(eq(cart_id))
        .times(1)
        .returning(|_| Ok(()));

    service(carts, MockBookRepository::new())
        .clear(user_id)
        .await
        .unwrap();
}
