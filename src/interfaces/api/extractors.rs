use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::common::errors::DomainError;

/// `Json` that rejects with the API error body
pub struct ApiJson<T>(pub T);

/// `Path` that rejects with the API error body
pub struct ApiPath<T>(pub T);

/// `Query` that rejects with the API error body
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

fn rejection_error(part: &'static str, reason: String) -> DomainError {
    tracing::warn!("Petición rechazada ({}): {}", part, reason);
    let mut err = DomainError::validation_error("Request", format!("Invalid request {}: {}", part, reason));
    err.details.insert("reason".to_string(), json!(reason));
    err
}

impl From<JsonRejection> for DomainError {
    fn from(rejection: JsonRejection) -> Self {
        rejection_error("body", rejection.body_text()).with_source(rejection)
    }
}

impl From<PathRejection> for DomainError {
    fn from(rejection: PathRejection) -> Self {
        rejection_error("path", rejection.body_text()).with_source(rejection)
    }
}

impl From<QueryRejection> for DomainError {
    fn from(rejection: QueryRejection) -> Self {
        rejection_error("query", rejection.body_text()).with_source(rejection)
    }
}
