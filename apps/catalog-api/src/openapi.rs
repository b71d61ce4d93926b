use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ProblemDetails)
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "API for managing product categories and the products they contain"
    ),
    servers(
        (url = "/api", description = "API base path")
    )
)]
struct BaseDoc;

/// Service document: base info plus the catalog's `/categories` and `/products` paths
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        BaseDoc::openapi().merge_from(domain_catalog::ApiDoc::openapi())
    }
}
