//! Infrastructure layer - External systems integration
//!
//! This module handles all persistence concerns: the database connection,
//! SeaORM entities, repositories, and the catalog search filter registry.

pub mod db;
pub mod filters;
pub mod repositories;

pub use db::{Database, Migrator};
pub use filters::{BookFilterProvider, BookFilterRegistry};
pub use repositories::{
    BookRepository, BookStore, CartRepository, CartStore, CategoryRepository, CategoryStore,
    OrderRepository, OrderStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBookRepository, MockCartRepository, MockCategoryRepository, MockOrderRepository,
    MockUserRepository,
};
