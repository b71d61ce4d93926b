//! Problem payload rendered for every failed request.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ErrorCode;

/// Media type of every problem response.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Structured error body.
///
/// `instance` and `traceId` are filled in by the
/// [`problem_details`](crate::http::problem_details) middleware. `exception` and
/// `debug` travel with the response but are only rendered when that middleware
/// is configured to expose internals.
///
/// # JSON Example
///
/// ```json
/// {
///   "status": 404,
///   "title": "Resource Not Found",
///   "detail": "Category with key '0190…' was not found",
///   "instance": "/api/categories/0190…",
///   "code": "NOT_FOUND",
///   "traceId": "0190…"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    /// HTTP status code, repeated in the body
    pub status: u16,
    /// Short summary of the problem kind
    pub title: String,
    /// Human-readable explanation of this occurrence
    pub detail: String,
    /// Request path that produced the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// Machine-readable error identifier
    pub code: String,
    /// Correlation id (`x-request-id` or generated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Itemized problems, e.g. `"Name: Name is required"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    /// Error type name, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    /// Debug rendering of the error, development only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<String>,
}

impl ProblemDetails {
    pub fn new(
        status: StatusCode,
        title: impl Into<String>,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            title: title.into(),
            detail: detail.into(),
            instance: None,
            code: code.into(),
            trace_id: None,
            errors: None,
            exception: None,
            debug: None,
        }
    }

    /// Status, title and code taken from a shared [`ErrorCode`].
    pub fn from_code(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::new(code.status(), code.title(), code.as_str(), detail)
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_exception(mut self, exception: impl Into<String>, debug: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self.debug = Some(debug.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Copy without `exception` and `debug`.
    pub fn without_internals(&self) -> Self {
        Self {
            exception: None,
            debug: None,
            ..self.clone()
        }
    }

    /// Serialize exactly as given, with the problem media type.
    pub fn render(&self) -> Response {
        match serde_json::to_vec(self) {
            Ok(body) => (
                self.status_code(),
                [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize problem details");
                self.status_code().into_response()
            }
        }
    }
}

impl IntoResponse for ProblemDetails {
    /// Renders the public view and keeps the full problem in the response
    /// extensions for the middleware.
    fn into_response(self) -> Response {
        let mut response = self.without_internals().render();
        response.extensions_mut().insert(self);
        response
    }
}
