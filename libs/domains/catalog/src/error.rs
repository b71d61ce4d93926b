use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{ErrorCode, ProblemDetails};
use sea_orm::DbErr;
use strum::IntoStaticStr;
use thiserror::Error;
use uuid::Uuid;

use crate::dto::ValidationError;

#[derive(Debug, Error, IntoStaticStr)]
pub enum CatalogError {
    #[error("One or more validation errors occurred")]
    Validation(Vec<ValidationError>),

    #[error("{entity} with key '{key}' was not found")]
    NotFound { entity: &'static str, key: String },

    #[error("A category named '{0}' already exists")]
    DuplicateCategoryName(String),

    #[error("A product named '{0}' already exists")]
    DuplicateProductName(String),

    #[error("Category '{category_id}' cannot be deleted because it still has {product_count} product(s)")]
    CategoryDeleteNotAllowed { category_id: Uuid, product_count: u64 },

    #[error("Requested page {requested_page} is out of range. Total pages: {total_pages}")]
    PaginationOutOfRange { requested_page: i64, total_pages: i64 },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Failed to {operation} {entity}: {source}")]
    Repository {
        operation: &'static str,
        entity: &'static str,
        #[source]
        source: DbErr,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// `map_err` adapter for storage calls.
    pub fn repository(operation: &'static str, entity: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Repository {
            operation,
            entity,
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError.as_str(),
            Self::NotFound { .. } => ErrorCode::NotFound.as_str(),
            Self::DuplicateCategoryName(_) => "CATEGORY_DUPLICATE_NAME",
            Self::DuplicateProductName(_) => "PRODUCT_DUPLICATE_NAME",
            Self::CategoryDeleteNotAllowed { .. } => "CATEGORY_DELETE_NOT_ALLOWED",
            Self::PaginationOutOfRange { .. } => "PAGINATION_OUT_OF_RANGE",
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument.as_str(),
            Self::Repository { .. } => ErrorCode::RepositoryFailure.as_str(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::PaginationOutOfRange { .. } | Self::InvalidArgument(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::DuplicateCategoryName(_)
            | Self::DuplicateProductName(_)
            | Self::CategoryDeleteNotAllowed { .. } => StatusCode::CONFLICT,
            Self::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError.title(),
            Self::NotFound { .. } => ErrorCode::NotFound.title(),
            Self::DuplicateCategoryName(_) | Self::DuplicateProductName(_) => {
                ErrorCode::Conflict.title()
            }
            Self::CategoryDeleteNotAllowed { .. } => "Delete Not Allowed",
            Self::PaginationOutOfRange { .. } => "Pagination Out Of Range",
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument.title(),
            Self::Repository { .. } => ErrorCode::RepositoryFailure.title(),
        }
    }

    fn detail(&self) -> String {
        match self {
            // Driver messages stay in `debug`.
            Self::Repository {
                operation, entity, ..
            } => format!("Failed to {} {}", operation, entity),
            other => other.to_string(),
        }
    }

    fn errors(&self) -> Option<Vec<String>> {
        match self {
            Self::Validation(errors) => Some(errors.iter().map(ToString::to_string).collect()),
            Self::CategoryDeleteNotAllowed {
                category_id,
                product_count,
            } => Some(vec![format!(
                "Category {} still has {} product(s)",
                category_id, product_count
            )]),
            Self::PaginationOutOfRange {
                requested_page,
                total_pages,
            } => Some(vec![format!(
                "Requested={}; Total={}",
                requested_page, total_pages
            )]),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            Self::Repository { .. } => {
                tracing::error!(error_code = self.code(), error = ?self, "{}", self)
            }
            Self::InvalidArgument(_) => tracing::warn!(error_code = self.code(), "{}", self),
            _ => tracing::info!(error_code = self.code(), "{}", self),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();

        let kind: &'static str = (&self).into();
        let mut problem = ProblemDetails::new(self.status(), self.title(), self.code(), self.detail())
            .with_exception(kind, format!("{:?}", self));
        if let Some(errors) = self.errors() {
            problem = problem.with_errors(errors);
        }
        problem.into_response()
    }
}
