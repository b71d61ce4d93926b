//! # Axum Helpers
//!
//! Shared plumbing for the HTTP services in this workspace.
//!
//! ## Modules
//!
//! - **[`server`]**: Router assembly with OpenAPI docs, health checks, graceful shutdown
//! - **[`http`]**: HTTP middleware (CORS, security headers, problem details)
//! - **[`errors`]**: Problem payloads, error codes, extractor and routing errors
//! - **[`envelope`]**: The `{ success, message, data, errors }` success envelope
//! - **[`extractors`]**: Path, JSON and query extractors that reject with problem payloads
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router};
//! use core_config::{Environment, server::ServerConfig};
//! use std::time::Duration;
//! use utoipa::OpenApi;
//!
//! #[derive(OpenApi)]
//! #[openapi(paths())]
//! struct ApiDoc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::default();
//!     let router = create_router::<ApiDoc>(Router::new(), &config, &Environment::Development)?;
//!     create_production_app(router, &config, Duration::from_secs(30), async {}).await?;
//!     Ok(())
//! }
//! ```

pub mod envelope;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

// Re-export server types
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks,
};

// Re-export HTTP middleware
pub use http::{
    ProblemDetailsOptions, create_cors_layer, create_permissive_cors_layer, problem_details,
    security_headers,
};

// Re-export error types
pub use errors::{AppError, ErrorCode, PROBLEM_JSON, ProblemDetails};

pub use envelope::ApiResponse;

// Re-export extractors
pub use extractors::{JsonBody, QueryParams, UuidPath};
