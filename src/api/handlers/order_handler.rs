//! Order handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{OrderItemResponse, OrderResponse};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, message = "Shipping address is required"))]
    #[schema(example = "221B Baker Street, London")]
    pub shipping_address: String,
}

/// Administrative status update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    #[schema(example = "COMPLETED")]
    pub status: String,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders_history).post(place_order))
        .route("/:id", axum::routing::patch(update_order_status))
        .route("/:id/items", get(order_items))
        .route("/:id/items/:item_id", get(order_item))
}

/// Convert the current user's cart into an order
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Validation error or empty cart"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Cart not found")
    )
)]
pub async fn place_order(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let order = state
        .order_service
        .place_order(current_user.id, payload.shipping_address)
        .await?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}

/// The current user's order history, one page at a time
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of the user's orders"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn orders_history(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    let (orders, total) = state
        .order_service
        .get_orders_history(current_user.id, &page)
        .await?;
    let responses = orders.into_iter().map(OrderResponse::from).collect();
    Ok(Json(Paginated::new(responses, &page, total)))
}

/// Items of one of the current user's orders
#[utoipa::path(
    get,
    path = "/orders/{id}/items",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order's items", body = Vec<OrderItemResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn order_items(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderItemResponse>>> {
    let items = state
        .order_service
        .get_order_items(current_user.id, id)
        .await?;
    Ok(Json(items.into_iter().map(OrderItemResponse::from).collect()))
}

/// One item of one of the current user's orders
#[utoipa::path(
    get,
    path = "/orders/{id}/items/{item_id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("item_id" = Uuid, Path, description = "Order item ID")
    ),
    responses(
        (status = 200, description = "The order item", body = OrderItemResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Order or item not found")
    )
)]
pub async fn order_item(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<OrderItemResponse>> {
    let item = state
        .order_service
        .get_order_item(current_user.id, id, item_id)
        .await?;
    Ok(Json(OrderItemResponse::from(item)))
}

/// Overwrite an order's status (admin only)
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unrecognized status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_order_status(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    require_admin(&current_user)?;
    let order = state
        .order_service
        .update_order_status(id, &payload.status)
        .await?;
    Ok(Json(OrderResponse::from(order)))
}
