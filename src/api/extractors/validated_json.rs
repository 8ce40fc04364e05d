//! Validated JSON extractor.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON extractor that validates the payload before the handler runs.
///
/// Validation failures become a 400 carrying one message per failed field.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Extract JSON
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        // Validate, collecting one message per failed field
        value.validate().map_err(|e| {
            let mut messages: Vec<String> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| match &error.message {
                        Some(message) => format!("{} {}", field, message),
                        None => format!("{} is invalid", field),
                    })
                })
                .collect();
            messages.sort();
            AppError::Validation(messages)
        })?;

        Ok(ValidatedJson(value))
    }
}
