//! HTTP endpoints for categories and products.
//!
//! Every success is wrapped in [`ApiResponse`](axum_helpers::ApiResponse); every
//! failure is a [`CatalogError`](crate::CatalogError) rendered as a problem payload.

pub mod categories;
pub mod products;

use axum::Router;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::models::{Category, Product};
use crate::repository::Repository;
use crate::service::{CategoryService, ProductService};

/// OpenAPI documentation for the catalog, relative to `/api`
#[derive(OpenApi)]
#[openapi(nest(
    (path = "/categories", api = categories::ApiDoc),
    (path = "/products", api = products::ApiDoc)
))]
pub struct ApiDoc;

/// Both resource routers, to be nested under `/api`.
pub fn router<C, P>(
    category_service: CategoryService<C, P>,
    product_service: ProductService<P, C>,
) -> Router
where
    C: Repository<Category> + 'static,
    P: Repository<Product> + 'static,
{
    Router::new()
        .nest("/categories", categories::router(category_service))
        .nest("/products", products::router(product_service))
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// 1-indexed paging parameters
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1
    #[serde(default = "default_page")]
    #[param(default = 1, example = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(default = 10, example = 10)]
    pub page_size: i64,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring of name or description; blank lists everything
    #[serde(default)]
    pub term: String,
}
