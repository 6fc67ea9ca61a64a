use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use tracing::info;
use validator::Validate;

use crate::utils::errors::AppError;

/// JSON extractor that deserializes and then validates the payload.
///
/// A body that cannot be parsed at all is a plain bad request; a body that
/// parses but fails validation carries its field errors into the
/// classification boundary, which enumerates every offending field.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                info!(error = %rejection.body_text(), "invalid request body");
                AppError::bad_request()
            })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}
