//! Shopping cart handlers, all scoped to the authenticated user.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::CartResponse;
use crate::errors::AppResult;

/// Request to add a book to the cart
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCartItemRequest {
    pub book_id: Uuid,
    /// Quantity, 1 to 99
    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    #[schema(example = 1, minimum = 1, maximum = 99)]
    pub quantity: i32,
}

/// Request to change a cart line's quantity
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCartItemRequest {
    /// Quantity, 1 to 99
    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    #[schema(example = 2, minimum = 1, maximum = 99)]
    pub quantity: i32,
}

/// Create shopping cart routes
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart).post(add_item))
        .route("/:item_id", axum::routing::put(update_item).delete(remove_item))
}

/// Get the current user's cart
#[utoipa::path(
    get,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's cart", body = CartResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart not found")
    )
)]
pub async fn get_cart(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<CartResponse>> {
    let cart = state.cart_service.get_cart(current_user.id).await?;
    Ok(Json(CartResponse::from(cart)))
}

/// Add a book to the current user's cart
#[utoipa::path(
    post,
    path = "/cart",
    tag = "Cart",
    security(("bearer_auth" = [])),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddCartItemRequest>,
) -> AppResult<Json<CartResponse>> {
    let cart = state
        .cart_service
        .add_item(current_user.id, payload.book_id, payload.quantity)
        .await?;
    Ok(Json(CartResponse::from(cart)))
}

/// Change the quantity of one of the current user's cart lines
#[utoipa::path(
    put,
    path = "/cart/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn update_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCartItemRequest>,
) -> AppResult<Json<CartResponse>> {
    let cart = state
        .cart_service
        .update_item_quantity(current_user.id, item_id, payload.quantity)
        .await?;
    Ok(Json(CartResponse::from(cart)))
}

/// Remove one of the current user's cart lines
#[utoipa::path(
    delete,
    path = "/cart/{item_id}",
    tag = "Cart",
    security(("bearer_auth" = [])),
    params(("item_id" = Uuid, Path, description = "Cart item ID")),
    responses(
        (status = 200, description = "Updated cart", body = CartResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart item not found")
    )
)]
pub async fn remove_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<CartResponse>> {
    let cart = state
        .cart_service
        .remove_item(current_user.id, item_id)
        .await?;
    Ok(Json(CartResponse::from(cart)))
}
