//! Repository layer - Data access abstraction
//!
//! Repository traits decouple services from SeaORM; stores implement them
//! against the live connection. Multi-record mutations own their own
//! transactions so a failure partway through leaves no partial state.

mod book_repository;
mod cart_repository;
mod category_repository;
pub(crate) mod entities;
mod order_repository;
mod user_repository;

pub use book_repository::{BookRepository, BookStore};
pub use cart_repository::{CartRepository, CartStore};
pub use category_repository::{CategoryRepository, CategoryStore};
pub use order_repository::{OrderRepository, OrderStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use book_repository::MockBookRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use cart_repository::MockCartRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use category_repository::MockCategoryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
