//! Book domain entity and catalog DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Book domain entity with its category membership materialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

/// Sparse search request for the catalog. Every populated field narrows
/// the result (AND); the values inside one field widen it (OR).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BookSearchParams {
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub prices: Vec<Decimal>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

impl BookSearchParams {
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
            && self.authors.is_empty()
            && self.prices.is_empty()
            && self.categories.is_empty()
    }
}

/// Payload for creating a book or fully overwriting its mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

/// Book detail returned by catalog endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub category_ids: Vec<Uuid>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            price: book.price,
            description: book.description,
            cover_image: book.cover_image,
            category_ids: book.category_ids,
        }
    }
}

/// Book listing entry without category ids (category browsing endpoint).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl From<Book> for BookSummary {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            price: book.price,
            description: book.description,
            cover_image: book.cover_image,
        }
    }
}
