//! HTTP middleware module.
//!
//! This module provides HTTP-level middleware for:
//! - CORS configuration
//! - Security headers
//! - Problem-details enrichment (instance, trace id, internals in development)
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{ProblemDetailsOptions, problem_details, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn_with_state(options, problem_details))
//!     .layer(axum::middleware::from_fn(security_headers));
//! ```

pub mod cors;
pub mod problem_details;
pub mod security;

// Re-export commonly used functions
pub use cors::{cors_layer_for, create_cors_layer, create_permissive_cors_layer};
pub use problem_details::{ProblemDetailsOptions, REQUEST_ID_HEADER, problem_details};
pub use security::security_headers;
