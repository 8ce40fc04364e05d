//! Category service unit tests.

use std::sync::Arc;

use mockall::predicate::eq;
use uuid::Uuid;

use bookstore_api::domain::{Category, NewCategory};
use bookstore_api::errors::AppError;
use bookstore_api::infra::MockCategoryRepository;
use bookstore_api::services::{CategoryManager, CategoryService};
use bookstore_api::types::PaginationParams;

fn make_category(id: Uuid, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
    }
}

fn service(repo: MockCategoryRepository) -> CategoryManager {
    CategoryManager::new(Arc::new(repo))
}

#[tokio::test]
async fn find_by_id_returns_the_stored_category() {
    let category_id = Uuid::new_v4();

    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id()
        .with(eq(category_id))
        .returning(|id| Ok(Some(make_category(id, "Fantasy"))));

    let category = service(repo).find_by_id(category_id).await.unwrap();
    assert_eq!(category.name, "Fantasy");
}

#[tokio::test]
async fn find_by_id_for_missing_id_names_the_id() {
    let category_id = Uuid::new_v4();

    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo).find_by_id(category_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(err.to_string().contains(&category_id.to_string()));
}

#[tokio::test]
async fn save_returns_the_created_category() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_insert()
        .withf(|payload| payload.name == "Science Fiction")
        .returning(|payload| {
            Ok(Category {
                id: Uuid::new_v4(),
                name: payload.name,
                description: payload.description,
            })
        });

    let category = service(repo)
        .save(NewCategory {
            name: "Science Fiction".to_string(),
            description: Some("Spaceships and such".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(category.name, "Science Fiction");
}

#[tokio::test]
async fn list_pages_through_the_repository() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_list().returning(|_| {
        Ok((
            vec![
                make_category(Uuid::new_v4(), "Fantasy"),
                make_category(Uuid::new_v4(), "Horror"),
            ],
            2,
        ))
    });

    let (categories, total) = service(repo)
        .find_all(&PaginationParams::default())
        .await
        .unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(total, 2);
}

#[tokio::test]
async fn delete_propagates_not_found() {
    let category_id = Uuid::new_v4();

    let mut repo = MockCategoryRepository::new();
    repo.expect_delete().returning(|id| {
        Err(AppError::not_found(format!(
            "Can't find category by id: {}",
            id
        )))
    });

    let err = service(repo).delete(category_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
