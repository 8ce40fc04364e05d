//! Domain layer - Core business entities and value objects.
//!
//! Plain structs with no infrastructure dependencies, plus the
//! wire-facing response DTOs and their `From` conversions.

pub mod book;
pub mod cart;
pub mod category;
pub mod order;
pub mod password;
pub mod user;

pub use book::{Book, BookResponse, BookSearchParams, BookSummary, NewBook};
pub use cart::{Cart, CartItem, CartItemResponse, CartResponse};
pub use category::{Category, CategoryResponse, NewCategory};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderItemResponse, OrderResponse, OrderStatus};
pub use password::Password;
pub use user::{NewUser, RoleName, User, UserResponse};
