use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    ApiResponse, JsonBody, QueryParams, UuidPath,
    errors::responses::{
        BadRequestResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use super::{PageQuery, SearchQuery};
use crate::dto::{
    CategoryProductCount, CreateProductRequest, PagedResponse, ProductDetailsResponse,
    ProductResponse, UpdateProductRequest,
};
use crate::entity::product;
use crate::error::CatalogResult;
use crate::models::{Category, Product};
use crate::repository::Repository;
use crate::service::ProductService;

type Service<P, C> = Arc<ProductService<P, C>>;

/// OpenAPI documentation for the products API
#[derive(OpenApi)]
#[openapi(
    paths(
        create_product,
        list_products,
        get_product,
        get_product_details,
        search_products,
        get_products_by_category,
        get_product_count_by_category,
        get_products_by_price_range,
        get_products_paged,
        get_product_count,
        update_product,
        delete_product,
    ),
    components(
        schemas(
            ProductResponse,
            ProductDetailsResponse,
            CreateProductRequest,
            UpdateProductRequest,
            CategoryProductCount,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = product::Model::TAG, description = "Product management endpoints")
    )
)]
pub struct ApiDoc;

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PriceRangeQuery {
    #[param(value_type = f64, example = 5.0)]
    pub min_price: Decimal,
    #[param(value_type = f64, example = 20.0)]
    pub max_price: Decimal,
}

/// Create the product router with all HTTP endpoints
pub fn router<P, C>(service: ProductService<P, C>) -> Router
where
    P: Repository<Product> + 'static,
    C: Repository<Category> + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/category/{category_id}", get(get_products_by_category))
        .route(
            "/category/{category_id}/count",
            get(get_product_count_by_category),
        )
        .route("/price-range", get(get_products_by_price_range))
        .route("/paged", get(get_products_paged))
        .route("/count", get(get_product_count))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/details", get(get_product_details))
        .with_state(shared_service)
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = product::Model::TAG,
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<P, C>(
    State(service): State<Service<P, C>>,
    JsonBody(request): JsonBody<CreateProductRequest>,
) -> CatalogResult<impl IntoResponse>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let product = service.create_product(request).await?;
    let location = format!("/api/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::ok("Product created", product)),
    ))
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = product::Model::TAG,
    responses(
        (status = 200, description = "Products retrieved", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<P, C>(
    State(service): State<Service<P, C>>,
) -> CatalogResult<Json<ApiResponse<Vec<ProductResponse>>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let products = service.get_all_products().await?;
    Ok(Json(ApiResponse::ok("Products retrieved", products)))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = product::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product retrieved", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<ProductResponse>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let product = service.get_product(id).await?;
    Ok(Json(ApiResponse::ok("Product retrieved", product)))
}

/// Get product details
#[utoipa::path(
    get,
    path = "/{id}/details",
    tag = product::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details retrieved", body = ApiResponse<ProductDetailsResponse>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_details<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<ProductDetailsResponse>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let details = service.get_product_details(id).await?;
    Ok(Json(ApiResponse::ok("Product details retrieved", details)))
}

/// Search products by name or description
#[utoipa::path(
    get,
    path = "/search",
    tag = product::Model::TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Products search result", body = ApiResponse<Vec<ProductResponse>>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<P, C>(
    State(service): State<Service<P, C>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> CatalogResult<Json<ApiResponse<Vec<ProductResponse>>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let products = service.search_products(&query.term).await?;
    Ok(Json(ApiResponse::ok("Products search result", products)))
}

/// List the products of one category
#[utoipa::path(
    get,
    path = "/category/{categoryId}",
    tag = product::Model::TAG,
    params(
        ("categoryId" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Products by category", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_products_by_category<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(category_id): UuidPath,
) -> CatalogResult<Json<ApiResponse<Vec<ProductResponse>>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let products = service.get_products_by_category(category_id).await?;
    Ok(Json(ApiResponse::ok("Products by category", products)))
}

/// Count the products of one category
#[utoipa::path(
    get,
    path = "/category/{categoryId}/count",
    tag = product::Model::TAG,
    params(
        ("categoryId" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Product count by category retrieved", body = ApiResponse<CategoryProductCount>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_count_by_category<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(category_id): UuidPath,
) -> CatalogResult<Json<ApiResponse<CategoryProductCount>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let count = service.get_product_count_by_category(category_id).await?;
    Ok(Json(ApiResponse::ok(
        "Product count by category retrieved",
        CategoryProductCount { category_id, count },
    )))
}

/// List products within a price range
#[utoipa::path(
    get,
    path = "/price-range",
    tag = product::Model::TAG,
    params(PriceRangeQuery),
    responses(
        (status = 200, description = "Products by price range", body = ApiResponse<Vec<ProductResponse>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_products_by_price_range<P, C>(
    State(service): State<Service<P, C>>,
    QueryParams(query): QueryParams<PriceRangeQuery>,
) -> CatalogResult<Json<ApiResponse<Vec<ProductResponse>>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let products = service
        .get_products_by_price_range(query.min_price, query.max_price)
        .await?;
    Ok(Json(ApiResponse::ok("Products by price range", products)))
}

/// Get one page of products
#[utoipa::path(
    get,
    path = "/paged",
    tag = product::Model::TAG,
    params(PageQuery),
    responses(
        (status = 200, description = "Products page retrieved", body = ApiResponse<PagedResponse<ProductResponse>>),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_products_paged<P, C>(
    State(service): State<Service<P, C>>,
    QueryParams(query): QueryParams<PageQuery>,
) -> CatalogResult<Json<ApiResponse<PagedResponse<ProductResponse>>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let page = service
        .get_products_paged(query.page, query.page_size)
        .await?;
    Ok(Json(ApiResponse::ok("Products page retrieved", page)))
}

/// Count all products
#[utoipa::path(
    get,
    path = "/count",
    tag = product::Model::TAG,
    responses(
        (status = 200, description = "Product count retrieved", body = ApiResponse<u64>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_count<P, C>(
    State(service): State<Service<P, C>>,
) -> CatalogResult<Json<ApiResponse<u64>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    let count = service.get_product_count().await?;
    Ok(Json(ApiResponse::ok("Product count retrieved", count)))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/{id}",
    tag = product::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID, must equal the body id")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductResponse>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(id): UuidPath,
    JsonBody(request): JsonBody<UpdateProductRequest>,
) -> CatalogResult<Response>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    if request.id != id {
        let envelope: ApiResponse<ProductResponse> = ApiResponse::fail(
            "Mismatched product id",
            vec![format!(
                "Path id {} does not match body id {}",
                id, request.id
            )],
        );
        return Ok((StatusCode::BAD_REQUEST, Json(envelope)).into_response());
    }

    let product = service.update_product(request).await?;
    Ok(Json(ApiResponse::ok("Product updated", product)).into_response())
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = product::Model::TAG,
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse<()>),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<P, C>(
    State(service): State<Service<P, C>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<ApiResponse<()>>>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    service.delete_product(id).await?;
    Ok(Json(ApiResponse::empty("Product deleted")))
}
