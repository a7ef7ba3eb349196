//! Request extractors that reject with `AppError` instead of axum's plain-text
//! rejections.

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use validator::Validate;

use crate::services::record_rejection;

/// JSON body that has passed its `validator` rules.
///
/// Unparseable bodies are a 400; well-formed JSON with missing or mistyped
/// fields, or fields that fail validation, is a 422.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                record_rejection("body");
                match rejection {
                    JsonRejection::JsonDataError(e) => {
                        AppError::invalid_field("body", "invalid", e.body_text())
                    }
                    other => AppError::BadRequest(anyhow::anyhow!(other.body_text())),
                }
            })?;

        value.validate().map_err(|e| {
            record_rejection("validation");
            AppError::ValidationError(e)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Query string; a malformed one is a 400.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| {
                record_rejection("query");
                AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
            })?;
        Ok(ApiQuery(value))
    }
}

/// Path parameters; one that does not parse (a malformed id) is a 400.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: PathRejection| {
                record_rejection("path");
                AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
            })?;
        Ok(ApiPath(value))
    }
}
