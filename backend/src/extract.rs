//! Request extractors that report malformed input as validation errors
//!
//! Wraps axum's `Json`, `Query` and `Path` so a body or parameter that does
//! not deserialize is answered with the usual error envelope, naming the
//! offending field when serde reports one.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON body; rejections become `AppError::Validation`
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

/// Query string; rejections become `AppError::Validation`
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

/// Path parameters; rejections become `AppError::Validation`
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Split an axum rejection text into the field it names and the constraint.
///
/// Rejection texts read `<context>: <path>: <serde message>` when serde
/// tracked a path, and `<context>: missing field `x` ...` for absent root
/// fields. Anything else is attributed to `fallback`.
pub fn locate_field(text: &str, fallback: &str) -> (String, String) {
    let detail = match text.split_once(": ") {
        Some((_, detail)) => detail,
        None => return (fallback.to_string(), text.to_string()),
    };

    if let Some((path, message)) = detail.split_once(": ") {
        if is_field_path(path) {
            return (path.to_string(), message.to_string());
        }
    }

    if let Some(name) = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return (name.to_string(), "is required".to_string());
    }

    (fallback.to_string(), detail.to_string())
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path != "."
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let (field, message) = match rejection {
            JsonRejection::MissingJsonContentType(_) => (
                "body".to_string(),
                "must be sent as application/json".to_string(),
            ),
            other => locate_field(&other.body_text(), "body"),
        };
        AppError::Validation { field, message }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        let (field, message) = locate_field(&rejection.body_text(), "query");
        AppError::Validation { field, message }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let (_, message) = locate_field(&rejection.body_text(), "id");
        AppError::Validation {
            field: "id".to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_serde_path() {
        let (field, message) = locate_field(
            "Failed to deserialize the JSON body into the target type: ph: invalid type: \
             boolean `true`, expected a Decimal at line 1 column 10",
            "body",
        );
        assert_eq!(field, "ph");
        assert!(message.starts_with("invalid type: boolean"));
    }

    #[test]
    fn test_field_inside_batch() {
        let (field, _) = locate_field(
            "Failed to deserialize the JSON body into the target type: [1].arrival_date: \
             input contains invalid characters at line 1 column 80",
            "body",
        );
        assert_eq!(field, "[1].arrival_date");
    }

    #[test]
    fn test_missing_root_field() {
        let (field, message) = locate_field(
            "Failed to deserialize the JSON body into the target type: missing field \
             `nitrogen` at line 1 column 14",
            "body",
        );
        assert_eq!(field, "nitrogen");
        assert_eq!(message, "is required");
    }

    #[test]
    fn test_syntax_error_falls_back() {
        let (field, message) = locate_field(
            "Failed to parse the request body as JSON: expected value at line 1 column 1",
            "body",
        );
        assert_eq!(field, "body");
        assert_eq!(message, "expected value at line 1 column 1");
    }

    #[test]
    fn test_query_without_path_falls_back() {
        let (field, _) = locate_field(
            "Failed to deserialize query string: invalid digit found in string",
            "query",
        );
        assert_eq!(field, "query");
    }
}
