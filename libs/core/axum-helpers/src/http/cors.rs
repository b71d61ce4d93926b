use axum::http::{HeaderName, HeaderValue, Method, header};
use core_config::{Environment, server::ServerConfig};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use super::REQUEST_ID_HEADER;

/// Creates a CORS layer with common settings for API services.
///
/// # Returns
/// A configured `CorsLayer` with:
/// - The given allowed origins
/// - Common HTTP methods (GET, POST, PUT, DELETE, PATCH, OPTIONS)
/// - Common headers (Content-Type, Accept, x-request-id)
/// - Credentials allowed
/// - 1 hour max age
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Creates a permissive CORS layer for development.
///
/// Allows any origin - **DO NOT USE IN PRODUCTION**.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

/// CORS policy for the configured origins.
///
/// Without configured origins, development is permissive and production
/// emits no CORS headers at all.
///
/// # Errors
/// Returns `InvalidInput` when an origin is not a valid header value.
pub fn cors_layer_for(server: &ServerConfig, environment: &Environment) -> io::Result<CorsLayer> {
    if server.cors_allowed_origins.is_empty() {
        return Ok(if environment.is_development() {
            warn!("CORS_ALLOWED_ORIGIN not set, allowing any origin in development");
            create_permissive_cors_layer()
        } else {
            info!("CORS_ALLOWED_ORIGIN not set, cross-origin requests are not allowed");
            CorsLayer::new()
        });
    }

    let origins = server
        .cors_allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
            )
        })?;

    info!(
        "CORS configured with allowed origins: {}",
        server.cors_allowed_origins.join(",")
    );
    Ok(create_cors_layer(origins))
}
