//! Catalog Domain
//!
//! Categories and the products that belong to them, stored in PostgreSQL
//! through SeaORM and exposed as a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, envelopes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, business rules, DTO mapping
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + PostgreSQL and in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Records, entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     CategoryService, InMemoryCatalog, ProductService, handlers,
//! };
//!
//! let catalog = InMemoryCatalog::new();
//! let categories = CategoryService::new(catalog.clone(), catalog.clone());
//! let products = ProductService::new(catalog.clone(), catalog);
//!
//! let router = handlers::router(categories, products);
//! ```

pub mod dto;
pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{CatalogError, CatalogResult};
pub use filter::{CategoryFilter, CategoryInclude, ProductFilter, ProductInclude};
pub use handlers::ApiDoc;
pub use models::{Category, Product};
pub use postgres::{PgCategoryRepository, PgProductRepository};
pub use repository::{InMemoryCatalog, Record, Repository};
pub use service::{CategoryService, ProductService};
