//! Identity service unit tests: registration, login, token round trip.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use bookstore_api::config::Config;
use bookstore_api::domain::{Password, RoleName, User, UserResponse};
use bookstore_api::errors::AppError;
use bookstore_api::infra::MockUserRepository;
use bookstore_api::services::{AuthService, Authenticator, Registration};

fn make_registration(email: &str) -> Registration {
    Registration {
        email: email.to_string(),
        password: "SecurePass123!".to_string(),
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        shipping_address: Some("221B Baker Street".to_string()),
    }
}

fn make_user(email: &str, password_hash: String) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash,
        first_name: "John".to_string(),
        last_name: "Doe".to_string(),
        shipping_address: None,
        roles: vec![RoleName::User],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn service(users: MockUserRepository) -> Authenticator {
    Authenticator::new(Arc::new(users), Config::from_env())
}

#[tokio::test]
async fn registering_a_taken_email_fails_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_exists_by_email()
        .withf(|email| email == "taken@example.com")
        .returning(|_| Ok(true));
    users.expect_create().never();

    let err = service(users)
        .register(make_registration("taken@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert!(err.to_string().contains("taken@example.com"));
}

#[tokio::test]
async fn registration_hashes_the_password_and_assigns_the_default_role() {
    let mut users = MockUserRepository::new();
    users.expect_exists_by_email().returning(|_| Ok(false));
    users
        .expect_create()
        .withf(|new_user| {
            new_user.email == "new@example.com"
                && new_user.password_hash != "SecurePass123!"
                && Password::from_hash(new_user.password_hash.clone()).verify("SecurePass123!")
        })
        .times(1)
        .returning(|new_user| {
            Ok(User {
                id: Uuid::new_v4(),
                email: new_user.email,
                password_hash: new_user.password_hash,
                first_name: new_user.first_name,
                last_name: new_user.last_name,
                shipping_address: new_user.shipping_address,
                roles: vec![RoleName::User],
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

    let user = service(users)
        .register(make_registration("new@example.com"))
        .await
        .unwrap();
    assert_eq!(user.roles, vec![RoleName::User]);

    // The public representation never carries the hash
    let body = serde_json::to_value(UserResponse::from(user)).unwrap();
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["email"], "new@example.com");
}

#[tokio::test]
async fn login_with_a_wrong_password_fails() {
    let hash = Password::new("CorrectHorse1!").unwrap().into_string();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |email| Ok(Some(make_user(email, hash.clone()))));

    let err = service(users)
        .login("user@example.com".to_string(), "WrongPassword1!".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_with_an_unknown_email_fails_the_same_way() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let err = service(users)
        .login("ghost@example.com".to_string(), "Whatever123!".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn login_issues_a_verifiable_bearer_token() {
    let hash = Password::new("CorrectHorse1!").unwrap().into_string();
    let user = make_user("user@example.com", hash);
    let user_id = user.id;

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let service = service(users);
    let token = service
        .login("user@example.com".to_string(), "CorrectHorse1!".to_string())
        .await
        .unwrap();
    assert_eq!(token.token_type, "Bearer");

    let claims = service.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.email, "user@example.com");
    assert_eq!(claims.role, "USER");
}

#[tokio::test]
async fn garbage_tokens_are_rejected() {
    let service = service(MockUserRepository::new());
    assert!(service.verify_token("not-a-jwt").is_err());
}
