//! Global problem-details enrichment.
//!
//! Every error response built from [`ProblemDetails`] carries the full problem in
//! its extensions. This middleware picks it up, stamps the request path and
//! trace id, and re-renders the body, including `exception`/`debug` only when
//! internals are exposed.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use core_config::Environment;
use uuid::Uuid;

use crate::errors::ProblemDetails;

/// Correlation header read into `traceId`.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProblemDetailsOptions {
    /// Render `exception` and `debug`
    pub expose_internals: bool,
}

impl ProblemDetailsOptions {
    pub fn for_environment(environment: &Environment) -> Self {
        Self {
            expose_internals: environment.is_development(),
        }
    }
}

fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

pub async fn problem_details(
    State(options): State<ProblemDetailsOptions>,
    request: Request,
    next: Next,
) -> Response {
    let instance = request.uri().path().to_owned();
    let trace_id = trace_id(request.headers());

    let mut response = next.run(request).await;
    let Some(mut problem) = response.extensions_mut().remove::<ProblemDetails>() else {
        return response;
    };

    problem.instance = Some(instance);
    problem.trace_id = Some(trace_id);
    if !options.expose_internals {
        problem = problem.without_internals();
    }

    let mut rendered = problem.render();
    for (name, value) in response.headers() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rendered.headers_mut().append(name.clone(), value.clone());
        }
    }
    *rendered.status_mut() = response.status();
    rendered
}
