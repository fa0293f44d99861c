//! JSON body extractor for the auth request DTOs.
//!
//! Malformed bodies and failed field rules both become
//! `AppError::Validation`, so every rejection shares the
//! `{ "error": { "code": "VALIDATION_ERROR", ... } }` shape.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use common::AppError;

/// Fallback when a failed rule carries no message.
const DEFAULT_MESSAGE: &str = "Validation failed";

/// Deserializes a JSON body and runs its `validator` rules before the
/// handler sees it.
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
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(status = %rejection.status(), "Rejected request body");
                AppError::validation(rejection.body_text())
            })?;

        payload
            .validate()
            .map_err(|errors| AppError::validation(report(&errors)))?;

        Ok(ValidatedJson(payload))
    }
}

/// Message of the first failing rule, taking fields in name order.
///
/// `ValidationErrors` keeps fields in a hash map; sorting makes a request
/// with several bad fields get the same answer every time.
fn report(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|(a, _), (b, _)| a.cmp(b));

    fields
        .into_iter()
        .flat_map(|(_, errors)| errors.iter())
        .find_map(|error| error.message.as_ref())
        .map(|message| message.to_string())
        .unwrap_or_else(|| DEFAULT_MESSAGE.to_string())
}
