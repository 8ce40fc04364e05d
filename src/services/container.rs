//! Service container - centralized service construction and access.
//!
//! Builds the repository stores and wires every service with its
//! collaborators through explicit constructor arguments.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, BookManager, BookService, CartManager, CartService,
    CategoryManager, CategoryService, OrderManager, OrderService,
};
use crate::config::Config;
use crate::infra::{BookFilterRegistry, BookStore, CartStore, CategoryStore, OrderStore, UserStore};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get identity service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get book catalog service
    fn books(&self) -> Arc<dyn BookService>;

    /// Get category service
    fn categories(&self) -> Arc<dyn CategoryService>;

    /// Get shopping cart service
    fn carts(&self) -> Arc<dyn CartService>;

    /// Get order service
    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    book_service: Arc<dyn BookService>,
    category_service: Arc<dyn CategoryService>,
    cart_service: Arc<dyn CartService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let books = Arc::new(BookStore::new(db.clone()));
        let categories = Arc::new(CategoryStore::new(db.clone()));
        let carts = Arc::new(CartStore::new(db.clone()));
        let orders = Arc::new(OrderStore::new(db));

        let filters = Arc::new(BookFilterRegistry::default());

        Self {
            auth_service: Arc::new(Authenticator::new(users, config)),
            book_service: Arc::new(BookManager::new(books.clone(), filters)),
            category_service: Arc::new(CategoryManager::new(categories)),
            cart_service: Arc::new(CartManager::new(carts.clone(), books)),
            order_service: Arc::new(OrderManager::new(orders, carts)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn books(&self) -> Arc<dyn BookService> {
        self.book_service.clone()
    }

    fn categories(&self) -> Arc<dyn CategoryService> {
        self.category_service.clone()
    }

    fn carts(&self) -> Arc<dyn CartService> {
        self.cart_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
