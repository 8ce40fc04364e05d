//! Category handlers.

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
use crate::domain::{BookSummary, CategoryResponse, NewCategory};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Category create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Fantasy")]
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryRequest> for NewCategory {
    fn from(payload: CategoryRequest) -> Self {
        NewCategory {
            name: payload.name,
            description: payload.description,
        }
    }
}

/// Create category routes
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:id",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/:id/books", get(books_by_category))
}

/// List categories, one page at a time
#[utoipa::path(
    get,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of categories"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CategoryResponse>>> {
    let (categories, total) = state.category_service.find_all(&page).await?;
    let responses = categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(Paginated::new(responses, &page, total)))
}

/// Get a category by id
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category detail", body = CategoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CategoryResponse>> {
    let category = state.category_service.find_by_id(id).await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Books belonging to a category, without their category id sets
#[utoipa::path(
    get,
    path = "/categories/{id}/books",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "One page of the category's books"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn books_by_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BookSummary>>> {
    let (books, total) = state.book_service.find_all_by_category(id, &page).await?;
    let summaries = books.into_iter().map(BookSummary::from).collect();
    Ok(Json(Paginated::new(summaries, &page, total)))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/categories",
    tag = "Categories",
    security(("bearer_auth" = [])),
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<(StatusCode, Json<CategoryResponse>)> {
    require_admin(&current_user)?;
    let category = state
        .category_service
        .save(NewCategory::from(payload))
        .await?;
    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Overwrite a category (admin only)
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn update_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    require_admin(&current_user)?;
    let category = state
        .category_service
        .update(id, NewCategory::from(payload))
        .await?;
    Ok(Json(CategoryResponse::from(category)))
}

/// Delete a category (admin only). Books are not cascade-deleted.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "Categories",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Category not found")
    )
)]
pub async fn delete_category(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&current_user)?;
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
