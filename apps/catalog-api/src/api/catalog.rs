use axum::Router;
use domain_catalog::{
    CategoryService, PgCategoryRepository, PgProductRepository, ProductService, handlers,
};

/// Mounts `/categories` and `/products` over one connection pool.
pub fn router(state: &crate::state::AppState) -> Router {
    let categories = PgCategoryRepository::new(state.db.clone());
    let products = PgProductRepository::new(state.db.clone());

    handlers::router(
        CategoryService::new(categories.clone(), products.clone()),
        ProductService::new(products, categories),
    )
}
