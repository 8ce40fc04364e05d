//! User repository.
//!
//! Registration is atomic: the user row, its default role assignment, and
//! the empty shopping cart provisioned for the new user commit in one
//! transaction, so a user never exists without a cart.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{role, shopping_cart, user, user_role};
use crate::config::ROLE_USER;
use crate::domain::{NewUser, RoleName, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email address, roles included
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Check whether an email address is already registered
    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Create a user with the default USER role and an empty shopping
    /// cart, atomically
    async fn create(&self, user: NewUser) -> AppResult<User>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_roles(&self, user_id: Uuid) -> AppResult<Vec<RoleName>> {
        let links = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .find_also_related(role::Entity)
            .all(&self.db)
            .await?;

        Ok(links
            .into_iter()
            .filter_map(|(_, role)| role)
            .map(|r| RoleName::from(r.name.as_str()))
            .collect())
    }

    async fn create_in_txn(txn: &DatabaseTransaction, payload: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(payload.email),
            password_hash: Set(payload.password_hash),
            first_name: Set(payload.first_name),
            last_name: Set(payload.last_name),
            shipping_address: Set(payload.shipping_address),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        let default_role = role::Entity::find()
            .filter(role::Column::Name.eq(ROLE_USER))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::internal("Default USER role is not seeded"))?;

        user_role::ActiveModel {
            user_id: Set(model.id),
            role_id: Set(default_role.id),
        }
        .insert(txn)
        .await?;

        // Exactly one cart per user, provisioned at registration
        shopping_cart::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(model.id),
            is_deleted: Set(false),
            created_at: Set(now),
        }
        .insert(txn)
        .await?;

        Ok(model.into_domain(vec![RoleName::User]))
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(model) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let roles = self.load_roles(model.id).await?;
        Ok(Some(model.into_domain(roles)))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, payload: NewUser) -> AppResult<User> {
        let txn = self.db.begin().await?;
        match Self::create_in_txn(&txn, payload).await {
            Ok(user) => {
                txn.commit().await?;
                Ok(user)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}
