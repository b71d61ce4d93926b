//! Extractors that reject with problem payloads instead of axum's plain-text bodies.

pub mod json_body;
pub mod query_params;
pub mod uuid_path;

pub use json_body::JsonBody;
pub use query_params::QueryParams;
pub use uuid_path::UuidPath;
