use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    ApiResponse, JsonBody, QueryParams, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use super::{PageQuery, SearchQuery};
use crate::dto::{
    CanDeleteResponse, CategoryDetailsResponse, CategoryResponse, CategorySummaryResponse,
    CreateCategoryRequest, PagedResponse, ProductSummaryResponse, UpdateCategoryRequest,
};
use crate::entity::category;
use crate::error::CatalogResult;
use crate::models::{Category, Product};
use crate::repository::Repository;
use crate::service::CategoryService;

type Service<C, P> = Arc<CategoryService<C, P>>;

/// OpenAPI documentation for the categories API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_category,
        list_categories,
        get_category,
        get_category_details,
        search_categories,
        get_categories_paged,
        get_category_count,
        get_category_by_name,
        get_categories_with_products,
        get_categories_with_product_count,
        get_top_categories,
        can_delete_category,
        update_category,
        delete_category,
    ),
    components(
        schemas(
            CategoryResponse,
            CategoryDetailsResponse,
            CategorySummaryResponse,
            ProductSummaryResponse,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CanDeleteResponse,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = category::Model::TAG, description = "Category management endpoints")
    )
)]
pub struct ApiDoc;

fn default_top_count() -> i64 {
    5
}

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopQuery {
    /// Number of categories to return
    #[serde(default = "default_top_count")]
    #[param(default = 5)]
    pub count: i64,
}

/// Create the category router with all HTTP endpoints
pub fn router<C, P>(service: CategoryService<C, P>) -> Router
where
    C: Repository<Category> + 'static,
    P: Repository<Product> + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/search", get(search_categories))
        .route("/paged", get(get_categories_paged))
        .route("/count", get(get_category_count))
        .route("/by-name/{name}", get(get_category_by_name))
        .route("/with-products", get(get_categories_with_products))
        .route("/with-product-count", get(get_categories_with_product_count))
        .route("/top", get(get_top_categories))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
        .route("/{id}/details", get(get_category_details))
        .route("/{id}/can-delete", get(can_delete_category))
        .with_state(shared_service)
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = category::Model::TAG,
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category<C, P>(
    State(service): State<Service<C, P>>,
    JsonBody(request): JsonBody<CreateCategoryRequest>,
) -> CatalogResult<impl IntoResponse>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let category = service.create_category(request).await?;
    let location = format!("/api/categories/{}", category.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::ok("Category created", category)),
    ))
}

/// List all categories
#[utoipa::path(
    get,
    path = "",
    tag = category::Model::TAG,
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories<C, P>(
    State(service): State<Service<C, P>>,
) -> CatalogResult<Json<ApiResponse<Vec<CategoryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let categories = service.get_all_categories().await?;
    Ok(Json(ApiResponse::ok("Categories retrieved", categories)))
}

/// Get a category by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = category::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category retrieved", body = ApiResponse<CategoryResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category<C, P>(
    State(service): State<Service<C, P>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<CategoryResponse>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let category = service.get_category(id).await?;
    Ok(Json(ApiResponse::ok("Category retrieved", category)))
}

/// Get a category with summaries of its products
#[utoipa::path(
    get,
    path = "/{id}/details",
    tag = category::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category details retrieved", body = ApiResponse<CategoryDetailsResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_details<C, P>(
    State(service): State<Service<C, P>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<CategoryDetailsResponse>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let details = service.get_category_details(id).await?;
    Ok(Json(ApiResponse::ok("Category details retrieved", details)))
}

/// Search categories by name or description
#[utoipa::path(
    get,
    path = "/search",
    tag = category::Model::TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Categories search result", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_categories<C, P>(
    State(service): State<Service<C, P>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> CatalogResult<Json<ApiResponse<Vec<CategoryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let categories = service.search_categories(&query.term).await?;
    Ok(Json(ApiResponse::ok("Categories search result", categories)))
}

/// Get one page of categories
#[utoipa::path(
    get,
    path = "/paged",
    tag = category::Model::TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Categories page retrieved", body = ApiResponse<PagedResponse<CategoryResponse>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_categories_paged<C, P>(
    State(service): State<Service<C, P>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> CatalogResult<Json<ApiResponse<PagedResponse<CategoryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let page = service
        .get_categories_paged(query.page, query.page_size)
        .await?;
    Ok(Json(ApiResponse::ok("Categories page retrieved", page)))
}

/// Count all categories
#[utoipa::path(
    get,
    path = "/count",
    tag = category::Model::TAG,
    responses(
        (status = 200, description = "Category count retrieved", body = ApiResponse<u64>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_count<C, P>(
    State(service): State<Service<C, P>>,
) -> CatalogResult<Json<ApiResponse<u64>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let count = service.get_category_count().await?;
    Ok(Json(ApiResponse::ok("Category count retrieved", count)))
}

/// Get a category by its exact name
#[utoipa::path(
    get,
    path = "/by-name/{name}",
    tag = category::Model::TAG,
    params(
        ("name" = String, Path, description = "Category name, case-sensitive")
    ),
    responses(
        (status = 200, description = "Category retrieved by name", body = ApiResponse<CategoryResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category_by_name<C, P>(
    State(service): State<Service<C, P>>,
    Path(name): Path<String>,
) -> CatalogResult<Json<ApiResponse<CategoryResponse>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let category = service.get_category_by_name(&name).await?;
    Ok(Json(ApiResponse::ok("Category retrieved by name", category)))
}

/// List categories that hold at least one product
#[utoipa::path(
    get,
    path = "/with-products",
    tag = category::Model::TAG,
    responses(
        (status = 200, description = "Categories with products retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_categories_with_products<C, P>(
    State(service): State<Service<C, P>>,
) -> CatalogResult<Json<ApiResponse<Vec<CategoryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let categories = service.get_categories_with_products().await?;
    Ok(Json(ApiResponse::ok(
        "Categories with products retrieved",
        categories,
    )))
}

/// List every category with its product count
#[utoipa::path(
    get,
    path = "/with-product-count",
    tag = category::Model::TAG,
    responses(
        (status = 200, description = "Category counts retrieved", body = ApiResponse<Vec<CategorySummaryResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_categories_with_product_count<C, P>(
    State(service): State<Service<C, P>>,
) -> CatalogResult<Json<ApiResponse<Vec<CategorySummaryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let summaries = service.get_categories_with_product_count().await?;
    Ok(Json(ApiResponse::ok("Category counts retrieved", summaries)))
}

/// Categories with the most products
#[utoipa::path(
    get,
    path = "/top",
    tag = category::Model::TAG,
    params(TopQuery),
    responses(
        (status = 200, description = "Top categories retrieved", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_top_categories<C, P>(
    State(service): State<Service<C, P>>,
    QueryParams(query): QueryParams<TopQuery>,
) -> CatalogResult<Json<ApiResponse<Vec<CategoryResponse>>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let categories = service
        .get_top_categories_by_product_count(query.count)
        .await?;
    Ok(Json(ApiResponse::ok("Top categories retrieved", categories)))
}

/// Whether a category has no products left
#[utoipa::path(
    get,
    path = "/{id}/can-delete",
    tag = category::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category delete status evaluated", body = ApiResponse<CanDeleteResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn can_delete_category<C, P>(
    State(service): State<Service<C, P>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<CanDeleteResponse>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    let can_delete = service.can_delete_category(id).await?;
    Ok(Json(ApiResponse::ok(
        "Category delete status evaluated",
        CanDeleteResponse { can_delete },
    )))
}

/// Replace a category
#[utoipa::path(
    put,
    path = "/{id}",
    tag = category::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID, must equal the body id")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category<C, P>(
    State(service): State<Service<C, P>>,
    UuidPath(id): UuidPath,
    JsonBody(request): JsonBody<UpdateCategoryRequest>,
) -> CatalogResult<Response>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    if request.id != id {
        let envelope: ApiResponse<CategoryResponse> = ApiResponse::fail(
            "Mismatched category id",
            vec![format!(
                "Path id {} does not match body id {}",
                id, request.id
            )],
        );
        return Ok((StatusCode::BAD_REQUEST, Json(envelope)).into_response());
    }

    let category = service.update_category(request).await?;
    Ok(Json(ApiResponse::ok("Category updated", category)).into_response())
}

/// Delete a category without products
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = category::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<()>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category<C, P>(
    State(service): State<Service<C, P>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<()>>>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    service.delete_category(id).await?;
    Ok(Json(ApiResponse::empty("Category deleted")))
}
