//! Book catalog service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;
use rust_decimal::Decimal;
use sea_orm::Condition;
use uuid::Uuid;

use bookstore_api::domain::{Book, BookSearchParams, NewBook};
use bookstore_api::errors::AppError;
use bookstore_api::infra::{BookFilterRegistry, MockBookRepository};
use bookstore_api::services::{BookManager, BookService};
use bookstore_api::types::PaginationParams;

fn make_book(id: Uuid, title: &str) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: "Author".to_string(),
        isbn: format!("isbn-{}", id),
        price: Decimal::new(1999, 2),
        description: None,
        cover_image: None,
        category_ids: vec![],
    }
}

fn make_payload(title: &str) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: "Author".to_string(),
        isbn: "978-0000000000".to_string(),
        price: Decimal::new(1999, 2),
        description: Some("A book".to_string()),
        cover_image: None,
        category_ids: vec![],
    }
}

fn service(repo: MockBookRepository) -> BookManager {
    BookManager::new(Arc::new(repo), Arc::new(BookFilterRegistry::default()))
}

#[tokio::test]
async fn find_by_id_returns_the_stored_book() {
    let book_id = Uuid::new_v4();

    let mut repo = MockBookRepository::new();
    repo.expect_find_by_id()
        .with(eq(book_id))
        .returning(move |id| Ok(Some(make_book(id, "Dune"))));

    let result = service(repo).find_by_id(book_id).await.unwrap();
    assert_eq!(result.id, book_id);
    assert_eq!(result.title, "Dune");
}

#[tokio::test]
async fn find_by_id_for_missing_id_names_the_id() {
    let book_id = Uuid::new_v4();

    let mut repo = MockBookRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo).find_by_id(book_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains(&book_id.to_string()));
}

#[tokio::test]
async fn save_returns_the_created_book() {
    let payload = make_payload("The Hobbit");
    let expected = payload.clone();

    let mut repo = MockBookRepository::new();
    repo.expect_insert()
        .withf(move |p| *p == expected)
        .returning(|p| {
            let id = Uuid::new_v4();
            Ok(Book {
                id,
                title: p.title.clone(),
                author: p.author.clone(),
                isbn: p.isbn.clone(),
                price: p.price,
                description: p.description.clone(),
                cover_image: p.cover_image.clone(),
                category_ids: p.category_ids.clone(),
            })
        });

    let book = service(repo).save(payload).await.unwrap();
    assert_eq!(book.title, "The Hobbit");
    assert_eq!(book.price, Decimal::new(1999, 2));
}

#[tokio::test]
async fn update_is_idempotent() {
    let book_id = Uuid::new_v4();
    let payload = make_payload("Revised Title");

    let mut repo = MockBookRepository::new();
    repo.expect_update()
        .times(2)
        .returning(move |id, p| {
            Ok(Book {
                id,
                title: p.title.clone(),
                author: p.author.clone(),
                isbn: p.isbn.clone(),
                price: p.price,
                description: p.description.clone(),
                cover_image: p.cover_image.clone(),
                category_ids: p.category_ids.clone(),
            })
        });

    let service = service(repo);
    let first = service.update(book_id, payload.clone()).await.unwrap();
    let second = service.update(book_id, payload).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn search_without_filters_uses_an_empty_condition() {
    let page = PaginationParams::default();

    let mut repo = MockBookRepository::new();
    repo.expect_search()
        .withf(|condition, _| *condition == Condition::all())
        .returning(|_, _| Ok((vec![make_book(Uuid::new_v4(), "Anything")], 1)));

    let (books, total) = service(repo)
        .search(&BookSearchParams::default(), &page)
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(total, 1);
}

#[tokio::test]
async fn search_by_titles_passes_the_title_clause() {
    let params = BookSearchParams {
        titles: vec!["A".to_string(), "C".to_string()],
        ..Default::default()
    };
    let expected_condition = BookFilterRegistry::default().build(&params).unwrap();

    let a = make_book(Uuid::new_v4(), "A");
    let c = make_book(Uuid::new_v4(), "C");
    let matched = vec![a.clone(), c.clone()];

    let mut repo = MockBookRepository::new();
    repo.expect_search()
        .withf(move |condition, _| *condition == expected_condition)
        .returning(move |_, _| Ok((matched.clone(), 2)));

    let (books, total) = service(repo)
        .search(&params, &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(total, 2);
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);
}

#[tokio::test]
async fn delete_propagates_not_found() {
    let book_id = Uuid::new_v4();

    let mut repo = MockBookRepository::new();
    repo.expect_delete()
        .with(eq(book_id))
        .returning(|id| Err(AppError::not_found(format!("Can't find book by id: {}", id))));

    let err = service(repo).delete(book_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn list_by_category_delegates_to_the_repository() {
    let category_id = Uuid::new_v4();

    let mut repo = MockBookRepository::new();
    repo.expect_list_by_category()
        .withf(move |id, _| *id == category_id)
        .returning(|_, _| Ok((vec![make_book(Uuid::new_v4(), "Fantasy Book")], 1)));

    let (books, total) = service(repo)
        .find_all_by_category(category_id, &PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(total, 1);
}
