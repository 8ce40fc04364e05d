//! Application state - Dependency injection container for handlers.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, BookService, CartService, CategoryService, OrderService, ServiceContainer,
    Services,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Identity service
    pub auth_service: Arc<dyn AuthService>,
    /// Book catalog service
    pub book_service: Arc<dyn BookService>,
    /// Category service
    pub category_service: Arc<dyn CategoryService>,
    /// Shopping cart service
    pub cart_service: Arc<dyn CartService>,
    /// Order service
    pub order_service: Arc<dyn OrderService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            book_service: container.books(),
            category_service: container.categories(),
            cart_service: container.carts(),
            order_service: container.orders(),
            database,
        }
    }
}
