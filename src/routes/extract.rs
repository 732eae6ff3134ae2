use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;

use crate::error::AppError;

/// Integer recommendation identity taken from the `:id` path segment.
///
/// A segment that is not an integer never names a recommendation, so it is
/// rejected as not found rather than as a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RecId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::NotFound(e.body_text()))?;

        raw.parse::<i64>().map(RecId).map_err(|_| {
            AppError::NotFound(format!("Recommendation with id '{raw}' was not found."))
        })
    }
}

/// JSON request body with rejections mapped onto the service's error contract:
/// a missing or non-JSON content type is 415, anything unparsable is 400.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for JsonBody {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(rejection)) => {
                Err(AppError::UnsupportedMediaType(rejection.body_text()))
            }
            Err(rejection) => Err(AppError::InvalidInput(rejection.body_text())),
        }
    }
}
