//! HTTP request handlers.

pub mod auth_handler;
pub mod book_handler;
pub mod cart_handler;
pub mod category_handler;
pub mod order_handler;

pub use auth_handler::auth_routes;
pub use book_handler::book_routes;
pub use cart_handler::cart_routes;
pub use category_handler::category_routes;
pub use order_handler::order_routes;
