//! Book catalog handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use axum_extra::extract::Query as MultiQuery;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{BookResponse, BookSearchParams, NewBook};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Book create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "The Hobbit")]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    #[schema(example = "J.R.R. Tolkien")]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN is required"))]
    #[schema(example = "978-0261103344")]
    pub isbn: String,
    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

fn validate_positive_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.message = Some("Price must be positive".into());
        return Err(error);
    }
    Ok(())
}

impl From<BookRequest> for NewBook {
    fn from(payload: BookRequest) -> Self {
        NewBook {
            title: payload.title,
            author: payload.author,
            isbn: payload.isbn,
            price: payload.price,
            description: payload.description,
            cover_image: payload.cover_image,
            category_ids: payload.category_ids,
        }
    }
}

/// Create book catalog routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/search", get(search_books))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// List the catalog, one page at a time
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "One page of books"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BookResponse>>> {
    let (books, total) = state.book_service.find_all(&page).await?;
    let responses = books.into_iter().map(BookResponse::from).collect();
    Ok(Json(Paginated::new(responses, &page, total)))
}

/// Search the catalog by titles, authors, prices, and categories
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "Books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books matching every populated filter"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    MultiQuery(params): MultiQuery<BookSearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Paginated<BookResponse>>> {
    let (books, total) = state.book_service.search(&params, &page).await?;
    let responses = books.into_iter().map(BookResponse::from).collect();
    Ok(Json(Paginated::new(responses, &page, total)))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail", body = BookResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookResponse>> {
    let book = state.book_service.find_by_id(id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Create a book (admin only)
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    security(("bearer_auth" = [])),
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn create_book(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BookRequest>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    require_admin(&current_user)?;
    let book = state.book_service.save(NewBook::from(payload)).await?;
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// Overwrite a book's mutable fields (admin only)
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    request_body = BookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<BookRequest>,
) -> AppResult<Json<BookResponse>> {
    require_admin(&current_user)?;
    let book = state.book_service.update(id, NewBook::from(payload)).await?;
    Ok(Json(BookResponse::from(book)))
}

/// Delete a book (admin only)
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_admin(&current_user)?;
    state.book_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
