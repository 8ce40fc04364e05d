//! Composable search filters for the book catalog.
//!
//! Each filterable field has its own provider translating that field's raw
//! values into one query clause (an `IN` disjunction). The registry combines
//! one clause per populated field conjunctively, so adding a new search
//! field means registering a provider, not touching the combination logic.

use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, Condition};
use uuid::Uuid;

use super::repositories::entities::{book, book_category};
use crate::domain::BookSearchParams;
use crate::errors::{AppError, AppResult};

/// Translates one search field's raw values into a query clause.
pub trait BookFilterProvider: std::fmt::Debug + Send + Sync {
    /// Field name this provider answers for
    fn key(&self) -> &'static str;

    /// Build the clause matching any of the supplied values
    fn condition(&self, values: &[String]) -> AppResult<Condition>;
}

/// Matches books whose title is any of the supplied values.
#[derive(Debug)]
struct TitleFilter;

impl BookFilterProvider for TitleFilter {
    fn key(&self) -> &'static str {
        "title"
    }

    fn condition(&self, values: &[String]) -> AppResult<Condition> {
        Ok(Condition::all().add(book::Column::Title.is_in(values.to_vec())))
    }
}

/// Matches books whose author is any of the supplied values.
#[derive(Debug)]
struct AuthorFilter;

impl BookFilterProvider for AuthorFilter {
    fn key(&self) -> &'static str {
        "author"
    }

    fn condition(&self, values: &[String]) -> AppResult<Condition> {
        Ok(Condition::all().add(book::Column::Author.is_in(values.to_vec())))
    }
}

/// Matches books priced at any of the supplied values.
#[derive(Debug)]
struct PriceFilter;

impl BookFilterProvider for PriceFilter {
    fn key(&self) -> &'static str {
        "price"
    }

    fn condition(&self, values: &[String]) -> AppResult<Condition> {
        let prices = values
            .iter()
            .map(|v| {
                Decimal::from_str(v)
                    .map_err(|_| AppError::bad_request(format!("Invalid price value: {}", v)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Condition::all().add(book::Column::Price.is_in(prices)))
    }
}

/// Matches books linked to any of the supplied category ids.
#[derive(Debug)]
struct CategoryFilter;

impl BookFilterProvider for CategoryFilter {
    fn key(&self) -> &'static str {
        "category"
    }

    fn condition(&self, values: &[String]) -> AppResult<Condition> {
        let ids = values
            .iter()
            .map(|v| {
                Uuid::from_str(v)
                    .map_err(|_| AppError::bad_request(format!("Invalid category id: {}", v)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let book_ids = Query::select()
            .column(book_category::Column::BookId)
            .from(book_category::Entity)
            .and_where(book_category::Column::CategoryId.is_in(ids))
            .to_owned();

        Ok(Condition::all().add(book::Column::Id.in_subquery(book_ids)))
    }
}

/// Registry of filter providers keyed by field name.
pub struct BookFilterRegistry {
    providers: Vec<Box<dyn BookFilterProvider>>,
}

impl Default for BookFilterRegistry {
    fn default() -> Self {
        Self {
            providers: vec![
                Box::new(TitleFilter),
                Box::new(AuthorFilter),
                Box::new(PriceFilter),
                Box::new(CategoryFilter),
            ],
        }
    }
}

impl BookFilterRegistry {
    /// Look up the provider for a field name.
    pub fn provider(&self, key: &str) -> AppResult<&dyn BookFilterProvider> {
        self.providers
            .iter()
            .find(|p| p.key() == key)
            .map(|p| p.as_ref())
            .ok_or_else(|| {
                AppError::not_found(format!("Can't find filter provider for key: {}", key))
            })
    }

    /// Combine one clause per populated search field. An all-empty request
    /// yields an empty condition that matches everything.
    pub fn build(&self, params: &BookSearchParams) -> AppResult<Condition> {
        let mut condition = Condition::all();

        if !params.titles.is_empty() {
            condition = condition.add(self.provider("title")?.condition(&params.titles)?);
        }
        if !params.authors.is_empty() {
            condition = condition.add(self.provider("author")?.condition(&params.authors)?);
        }
        if !params.prices.is_empty() {
            let values: Vec<String> = params.prices.iter().map(ToString::to_string).collect();
            condition = condition.add(self.provider("price")?.condition(&values)?);
        }
        if !params.categories.is_empty() {
            let values: Vec<String> = params.categories.iter().map(ToString::to_string).collect();
            condition = condition.add(self.provider("category")?.condition(&values)?);
        }

        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_build_an_empty_condition() {
        let registry = BookFilterRegistry::default();
        let condition = registry.build(&BookSearchParams::default()).unwrap();
        assert_eq!(condition, Condition::all());
    }

    #[test]
    fn populated_fields_combine_conjunctively() {
        let registry = BookFilterRegistry::default();
        let params = BookSearchParams {
            titles: vec!["Dune".to_string(), "Hyperion".to_string()],
            authors: vec!["Frank Herbert".to_string()],
            ..Default::default()
        };

        let condition = registry.build(&params).unwrap();

        let expected = Condition::all()
            .add(
                Condition::all().add(
                    book::Column::Title.is_in(vec!["Dune".to_string(), "Hyperion".to_string()]),
                ),
            )
            .add(
                Condition::all()
                    .add(book::Column::Author.is_in(vec!["Frank Herbert".to_string()])),
            );
        assert_eq!(condition, expected);
    }

    #[test]
    fn unknown_key_has_no_provider() {
        let registry = BookFilterRegistry::default();
        let err = registry.provider("publisher").unwrap_err();
        assert!(err
            .to_string()
            .contains("Can't find filter provider for key: publisher"));
    }

    #[test]
    fn price_values_must_parse() {
        let registry = BookFilterRegistry::default();
        let err = registry
            .provider("price")
            .unwrap()
            .condition(&["not-a-number".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("Invalid price value"));
    }
}
