//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use queries::QueryError;
use saga::LinkError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Linking saga error.
    Link(LinkError),
    /// Query-side error.
    Query(QueryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Link(err) => link_error_to_response(err),
            ApiError::Query(err) => query_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn link_error_to_response(err: LinkError) -> (StatusCode, String) {
    match &err {
        LinkError::ProfileNotFound(_)
        | LinkError::SkillsNotFound(_)
        | LinkError::IdentityNotFound(_)
        | LinkError::ProjectNotFound(_)
        | LinkError::LinkNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        LinkError::AlreadyLinked { .. } => (StatusCode::CONFLICT, err.to_string()),
        LinkError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        LinkError::RegistryRejected { .. } => (StatusCode::BAD_GATEWAY, err.to_string()),
        LinkError::DependencyUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        LinkError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn query_error_to_response(err: QueryError) -> (StatusCode, String) {
    match &err {
        QueryError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        QueryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        QueryError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        QueryError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        ApiError::Link(err)
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Query(err)
    }
}
