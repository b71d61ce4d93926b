//! Reusable OpenAPI response types for problem payloads.

use super::ProblemDetails;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Unexpected Error",
    content_type = "application/problem+json",
    example = json!({
        "status": 500,
        "title": "Unexpected Error",
        "detail": "An unexpected error occurred",
        "instance": "/api/products",
        "code": "UNHANDLED",
        "traceId": "01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f"
    })
)]
pub struct InternalServerErrorResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/problem+json",
    example = json!({
        "status": 400,
        "title": "Validation Failed",
        "detail": "One or more validation errors occurred",
        "instance": "/api/products",
        "code": "VALIDATION_ERROR",
        "traceId": "01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f",
        "errors": ["Name: Product name is required", "Price: Price must be greater than 0"]
    })
)]
pub struct BadRequestValidationResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Malformed input",
    content_type = "application/problem+json",
    example = json!({
        "status": 400,
        "title": "Request Error",
        "detail": "'abc' is not a valid UUID",
        "instance": "/api/products/abc",
        "code": "INVALID_UUID",
        "traceId": "01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f"
    })
)]
pub struct BadRequestResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/problem+json",
    example = json!({
        "status": 404,
        "title": "Resource Not Found",
        "detail": "Product with key '01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f' was not found",
        "instance": "/api/products/01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f",
        "code": "NOT_FOUND",
        "traceId": "01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f"
    })
)]
pub struct NotFoundResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Conflict with the current resource state",
    content_type = "application/problem+json",
    example = json!({
        "status": 409,
        "title": "Conflict",
        "detail": "A category named 'Books' already exists",
        "instance": "/api/categories",
        "code": "CATEGORY_DUPLICATE_NAME",
        "traceId": "01935a4e-8f6b-7c2d-9e1f-0a1b2c3d4e5f"
    })
)]
pub struct ConflictResponse(pub ProblemDetails);
