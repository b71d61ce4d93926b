//! Type-safe error codes for problem responses.
//!
//! Each code carries:
//! - String representation for client consumption (e.g., "VALIDATION_ERROR")
//! - Integer code for logging and monitoring (e.g., 1001)
//! - HTTP status and problem title
//! - Default human-readable message
//!
//! Domain crates with their own codes (e.g. duplicate names) pass plain strings
//! to [`ProblemDetails`](super::ProblemDetails); this enum covers the codes shared by every service.
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.title(), "Validation Failed");
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request validation failed
    ValidationError,

    /// Invalid UUID format in path parameter
    InvalidUuid,

    /// Request body is not valid JSON for the expected shape
    InvalidJson,

    /// Query string could not be deserialized
    InvalidQuery,

    /// Argument outside its accepted domain
    InvalidArgument,

    /// Requested resource or route was not found
    NotFound,

    /// Request conflicts with current resource state
    Conflict,

    // Server errors (5000s)
    /// Storage layer failure
    #[serde(rename = "REPOSITORY_OPERATION_FAILED")]
    RepositoryFailure,

    /// Anything not classified above, including panics
    Unhandled,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::InvalidJson => "INVALID_JSON",
            Self::InvalidQuery => "INVALID_QUERY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::RepositoryFailure => "REPOSITORY_OPERATION_FAILED",
            Self::Unhandled => "UNHANDLED",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 5000-5999: server errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::InvalidJson => 1003,
            Self::NotFound => 1004,
            Self::Conflict => 1008,
            Self::InvalidQuery => 1010,
            Self::InvalidArgument => 1011,
            Self::RepositoryFailure => 5001,
            Self::Unhandled => 5099,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::InvalidUuid
            | Self::InvalidJson
            | Self::InvalidQuery
            | Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RepositoryFailure | Self::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short, stable problem title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation Failed",
            Self::InvalidUuid | Self::InvalidJson | Self::InvalidQuery | Self::InvalidArgument => {
                "Request Error"
            }
            Self::NotFound => "Resource Not Found",
            Self::Conflict => "Conflict",
            Self::RepositoryFailure => "Repository Failure",
            Self::Unhandled => "Unexpected Error",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::InvalidJson => "Invalid JSON format",
            Self::InvalidQuery => "Invalid query string",
            Self::InvalidArgument => "Invalid argument",
            Self::NotFound => "Resource not found",
            Self::Conflict => "Resource already exists",
            Self::RepositoryFailure => "A data access error occurred",
            Self::Unhandled => "An unexpected error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::NotFound.as_str(), "NOT_FOUND");
        assert_eq!(
            ErrorCode::RepositoryFailure.as_str(),
            "REPOSITORY_OPERATION_FAILED"
        );
    }

    #[test]
    fn test_error_code_status() {
        assert_eq!(ErrorCode::InvalidUuid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::Unhandled.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_titles() {
        assert_eq!(ErrorCode::InvalidJson.title(), "Request Error");
        assert_eq!(ErrorCode::NotFound.title(), "Resource Not Found");
        assert_eq!(ErrorCode::Unhandled.title(), "Unexpected Error");
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidQuery.to_string(), "INVALID_QUERY");
    }

    #[test]
    fn test_error_code_serialization_matches_as_str() {
        for code in [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::InvalidJson,
            ErrorCode::InvalidQuery,
            ErrorCode::InvalidArgument,
            ErrorCode::NotFound,
            ErrorCode::Conflict,
            ErrorCode::RepositoryFailure,
            ErrorCode::Unhandled,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }
}
