//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, book_handler, cart_handler, category_handler, order_handler,
};
use crate::domain::{
    BookResponse, BookSummary, CartItemResponse, CartResponse, CategoryResponse,
    OrderItemResponse, OrderResponse, OrderStatus, RoleName, UserResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Bookstore API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookstore API",
        version = "0.1.0",
        description = "Online bookstore backend: catalog, shopping cart, and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Catalog endpoints
        book_handler::list_books,
        book_handler::search_books,
        book_handler::get_book,
        book_handler::create_book,
        book_handler::update_book,
        book_handler::delete_book,
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::books_by_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        // Cart endpoints
        cart_handler::get_cart,
        cart_handler::add_item,
        cart_handler::update_item,
        cart_handler::remove_item,
        // Order endpoints
        order_handler::place_order,
        order_handler::orders_history,
        order_handler::order_items,
        order_handler::order_item,
        order_handler::update_order_status,
    ),
    components(
        schemas(
            // Domain types
            RoleName,
            UserResponse,
            BookResponse,
            BookSummary,
            CategoryResponse,
            CartResponse,
            CartItemResponse,
            OrderResponse,
            OrderItemResponse,
            OrderStatus,
            TokenResponse,
            // Request types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            book_handler::BookRequest,
            category_handler::CategoryRequest,
            cart_handler::AddCartItemRequest,
            cart_handler::UpdateCartItemRequest,
            order_handler::PlaceOrderRequest,
            order_handler::UpdateOrderStatusRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Books", description = "Catalog browsing, search, and administration"),
        (name = "Categories", description = "Category browsing and administration"),
        (name = "Cart", description = "The authenticated user's shopping cart"),
        (name = "Orders", description = "Checkout, order history, and status updates")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
