pub mod codes;
pub mod problem;
pub mod responses;

pub use codes::ErrorCode;
pub use problem::{PROBLEM_JSON, ProblemDetails};

use std::any::Any;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors raised by the HTTP layer itself, before or around domain code.
///
/// Domain crates render their own error enums as [`ProblemDetails`]; this type
/// covers malformed input, unknown routes and panics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl AppError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::InvalidJson(_) => ErrorCode::InvalidJson,
            AppError::InvalidQuery(_) => ErrorCode::InvalidQuery,
            AppError::InvalidUuid(_) => ErrorCode::InvalidUuid,
            AppError::RouteNotFound(_) => ErrorCode::NotFound,
            AppError::Panic(_) => ErrorCode::Unhandled,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidJson(_) => "InvalidJson",
            AppError::InvalidQuery(_) => "InvalidQuery",
            AppError::InvalidUuid(_) => "InvalidUuid",
            AppError::RouteNotFound(_) => "RouteNotFound",
            AppError::Panic(_) => "Panic",
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::InvalidJson(e) => e.body_text(),
            AppError::InvalidQuery(e) => e.body_text(),
            AppError::InvalidUuid(value) => format!("'{}' is not a valid UUID", value),
            AppError::RouteNotFound(path) => format!("No resource matches '{}'", path),
            // The panic message is only exposed through `debug`.
            AppError::Panic(_) => ErrorCode::Unhandled.default_message().to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidJson(JsonRejection::MissingJsonContentType(_)) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            other => other.error_code().status(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        match &self {
            AppError::Panic(message) => {
                tracing::error!(error_code = code.code(), "Handler panicked: {}", message)
            }
            other => tracing::info!(error_code = code.code(), "{}", other),
        }

        ProblemDetails::new(self.status(), code.title(), code.as_str(), self.detail())
            .with_exception(self.kind(), format!("{:?}", self))
            .into_response()
    }
}

/// Fallback for unmatched routes.
pub async fn not_found(uri: Uri) -> Response {
    AppError::RouteNotFound(uri.path().to_string()).into_response()
}

/// Response factory for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "non-string panic payload".to_string()
    };

    AppError::Panic(message).into_response()
}
