//! Handler tests for the Catalog domain
//!
//! These tests drive the catalog router over the in-memory store:
//! - Request deserialization (JSON → Rust structs)
//! - Envelope and problem payloads
//! - HTTP status codes and error codes
//!
//! PostgreSQL behavior is covered by `integration_test.rs`.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_catalog::*;
use http_body_util::BodyExt;
use sea_orm::DbErr;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn app() -> Router {
    let catalog = InMemoryCatalog::new();
    handlers::router(
        CategoryService::new(catalog.clone(), catalog.clone()),
        ProductService::new(catalog.clone(), catalog),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_category(app: &Router, name: &str) -> String {
    let (status, body) = send(app, "POST", "/categories", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_product(app: &Router, name: &str, price: f64, category_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": name, "price": price, "categoryId": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn test_create_category_returns_201_with_location() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/categories")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "name": "Books", "description": "Paper and ink" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Category created");
    assert_eq!(body["data"]["name"], "Books");
    assert_eq!(body["data"]["description"], "Paper and ink");
    assert_eq!(
        location,
        format!("/api/categories/{}", body["data"]["id"].as_str().unwrap())
    );
}

#[tokio::test]
async fn test_create_category_with_blank_name_returns_validation_problem() {
    let app = app();

    let (status, body) = send(&app, "POST", "/categories", Some(json!({ "name": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["status"], 400);
    assert_eq!(body["errors"], json!(["Name: Category name is required"]));
}

#[tokio::test]
async fn test_create_duplicate_category_returns_409() {
    let app = app();
    create_category(&app, "Books").await;

    let (status, body) = send(&app, "POST", "/categories", Some(json!({ "name": "Books" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CATEGORY_DUPLICATE_NAME");
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/categories")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_category_with_invalid_uuid_returns_400() {
    let app = app();

    let (status, body) = send(&app, "GET", "/categories/not-a-uuid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_UUID");
}

#[tokio::test]
async fn test_get_missing_category_returns_404() {
    let app = app();
    let id = Uuid::new_v4();

    let (status, body) = send(&app, "GET", &format!("/categories/{id}"), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(
        body["detail"],
        format!("Category with key '{id}' was not found")
    );
}

#[tokio::test]
async fn test_update_category_with_mismatched_id_returns_envelope_failure() {
    let app = app();
    let id = create_category(&app, "Books").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/categories/{id}"),
        Some(json!({ "id": Uuid::new_v4(), "name": "Novels" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Mismatched category id");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_category_renames() {
    let app = app();
    let id = create_category(&app, "Books").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/categories/{id}"),
        Some(json!({ "id": id, "name": "Novels", "description": "Fiction" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category updated");
    assert_eq!(body["data"]["name"], "Novels");

    let (_, body) = send(&app, "GET", "/categories/by-name/Novels", None).await;
    assert_eq!(body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn test_delete_empty_category() {
    let app = app();
    let id = create_category(&app, "Books").await;

    let (status, body) = send(&app, "DELETE", &format!("/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Category deleted");
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send(&app, "GET", &format!("/categories/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_with_products_cannot_be_deleted() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    let product_id = create_product(&app, "Novel", 9.99, &category_id).await;

    let (status, body) = send(&app, "GET", &format!("/products/{product_id}/details"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categoryName"], "Books");
    assert_eq!(body["data"]["price"], json!(9.99));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/categories/{category_id}/can-delete"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["canDelete"], false);

    let (status, body) = send(&app, "DELETE", &format!("/categories/{category_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CATEGORY_DELETE_NOT_ALLOWED");
    assert_eq!(
        body["errors"],
        json!([format!("Category {category_id} still has 1 product(s)")])
    );

    // Still there, products untouched
    let (status, _) = send(&app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_category_details_list_products() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    create_product(&app, "Novel", 9.99, &category_id).await;
    create_product(&app, "Atlas", 25.0, &category_id).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/categories/{category_id}/details"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], "Novel");
    assert_eq!(products[1]["name"], "Atlas");
}

#[tokio::test]
async fn test_top_categories_by_product_count() {
    let app = app();
    let books = create_category(&app, "Books").await;
    let games = create_category(&app, "Games").await;
    create_category(&app, "Empty").await;
    create_product(&app, "Chess", 30.0, &games).await;
    create_product(&app, "Go", 40.0, &games).await;
    create_product(&app, "Novel", 9.99, &books).await;

    let (status, body) = send(&app, "GET", "/categories/top?count=2", None).await;

    assert_eq!(status, StatusCode::OK);
    let top = body["data"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["name"], "Games");
    assert_eq!(top[1]["name"], "Books");
}

#[tokio::test]
async fn test_categories_paged() {
    let app = app();
    for name in ["A", "B", "C"] {
        create_category(&app, name).await;
    }

    let (status, body) = send(&app, "GET", "/categories/paged?page=2&pageSize=2", None).await;

    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["items"].as_array().unwrap().len(), 1);
    assert_eq!(page["items"][0]["name"], "C");
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasPreviousPage"], true);
    assert_eq!(page["hasNextPage"], false);
}

#[tokio::test]
async fn test_category_count() {
    let app = app();
    create_category(&app, "Books").await;

    let (status, body) = send(&app, "GET", "/categories/count", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], 1);
}

#[tokio::test]
async fn test_categories_with_product_count() {
    let app = app();
    let books = create_category(&app, "Books").await;
    create_category(&app, "Empty").await;
    create_product(&app, "Novel", 9.99, &books).await;

    let (status, body) = send(&app, "GET", "/categories/with-product-count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Books");
    assert_eq!(body["data"][0]["productCount"], 1);
    assert_eq!(body["data"][1]["productCount"], 0);

    let (_, body) = send(&app, "GET", "/categories/with-products", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["id"], books.as_str());
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_create_product_for_unknown_category_is_rejected() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Novel", "price": 9.99, "categoryId": Uuid::new_v4() })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["errors"],
        json!(["CategoryId: Category does not exist"])
    );
}

#[tokio::test]
async fn test_create_product_collects_every_field_error() {
    let app = app();
    let category_id = create_category(&app, "Books").await;

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "", "price": 0, "categoryId": category_id })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Name: Product name is required",
            "Price: Product price must be greater than 0"
        ])
    );
}

#[tokio::test]
async fn test_price_that_rounds_to_zero_is_rejected() {
    let app = app();
    let category_id = create_category(&app, "Books").await;

    let (status, body) = send(
        &app,
        "POST",
        "/products",
        Some(json!({ "name": "Dust", "price": 0.004, "categoryId": category_id })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["errors"],
        json!(["Price: Product price must be greater than 0"])
    );

    let (_, body) = send(&app, "GET", "/products/count", None).await;
    assert_eq!(body["data"], 0);
}

#[tokio::test]
async fn test_products_page_with_maximal_page_size() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    create_product(&app, "A", 1.0, &category_id).await;
    create_product(&app, "B", 2.0, &category_id).await;

    let uri = format!("/products/paged?page=1&pageSize={}", i64::MAX);
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["hasNextPage"], false);

    let uri = format!("/categories/paged?page=2&pageSize={}", i64::MAX);
    let (status, body) = send(&app, "GET", &uri, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PAGINATION_OUT_OF_RANGE");
    assert_eq!(body["errors"], json!(["Requested=2; Total=1"]));
}

#[tokio::test]
async fn test_products_page_out_of_range() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    for (name, price) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
        create_product(&app, name, price, &category_id).await;
    }

    let (status, body) = send(&app, "GET", "/products/paged?page=5&pageSize=10", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "PAGINATION_OUT_OF_RANGE");
    assert_eq!(body["errors"], json!(["Requested=5; Total=1"]));
}

#[tokio::test]
async fn test_products_page_zero_is_invalid() {
    let app = app();

    let (status, body) = send(&app, "GET", "/products/paged?page=0", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_empty_products_page_is_not_out_of_range() {
    let app = app();

    let (status, body) = send(&app, "GET", "/products/paged?page=3", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 0);
    assert_eq!(body["data"]["totalPages"], 0);
}

#[tokio::test]
async fn test_products_by_price_range() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    create_product(&app, "Cheap", 5.0, &category_id).await;
    create_product(&app, "Middle", 10.0, &category_id).await;
    create_product(&app, "Dear", 50.0, &category_id).await;

    let (status, body) = send(
        &app,
        "GET",
        "/products/price-range?minPrice=5&maxPrice=10",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Cheap", "Middle"]);

    let (status, body) = send(
        &app,
        "GET",
        "/products/price-range?minPrice=10&maxPrice=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_products_by_category_and_count() {
    let app = app();
    let books = create_category(&app, "Books").await;
    let games = create_category(&app, "Games").await;
    create_product(&app, "Novel", 9.99, &books).await;
    create_product(&app, "Chess", 30.0, &games).await;

    let (status, body) = send(&app, "GET", &format!("/products/category/{books}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Novel");

    let (status, body) = send(
        &app,
        "GET",
        &format!("/products/category/{books}/count"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["categoryId"], books.as_str());
    assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_search_products() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    create_product(&app, "Blue Novel", 9.99, &category_id).await;
    create_product(&app, "Red Atlas", 25.0, &category_id).await;

    let (status, body) = send(&app, "GET", "/products/search?term=Novel", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Products search result");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Blue Novel");
}

#[tokio::test]
async fn test_update_product_moves_category() {
    let app = app();
    let books = create_category(&app, "Books").await;
    let games = create_category(&app, "Games").await;
    let id = create_product(&app, "Puzzle", 12.5, &books).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/products/{id}"),
        Some(json!({ "id": id, "name": "Puzzle", "price": 14.0, "categoryId": games })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product updated");
    assert_eq!(body["data"]["categoryId"], games.as_str());
    assert_eq!(body["data"]["categoryName"], "Games");
    assert_eq!(body["data"]["price"], json!(14.0));
}

#[tokio::test]
async fn test_update_missing_product_returns_404() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    let id = Uuid::new_v4();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/products/{id}"),
        Some(json!({ "id": id, "name": "Ghost", "price": 1.0, "categoryId": category_id })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_product() {
    let app = app();
    let category_id = create_category(&app, "Books").await;
    let id = create_product(&app, "Novel", 9.99, &category_id).await;

    let (status, body) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted");

    let (status, _) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/products/count", None).await;
    assert_eq!(body["data"], 0);
}

// ============================================================================
// Storage failures
// ============================================================================

/// Category store whose every call fails like a dropped connection.
struct Unavailable;

fn unavailable<T>() -> CatalogResult<T> {
    Err(CatalogError::repository("query", "Category")(DbErr::Custom(
        "connection refused".to_string(),
    )))
}

#[async_trait]
impl Repository<Category> for Unavailable {
    async fn get_all(&self, _includes: &[CategoryInclude]) -> CatalogResult<Vec<Category>> {
        unavailable()
    }

    async fn get_by_id(
        &self,
        _id: Uuid,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        unavailable()
    }

    async fn create(&self, _entity: Category) -> CatalogResult<Category> {
        unavailable()
    }

    async fn update(&self, _entity: Category) -> CatalogResult<Category> {
        unavailable()
    }

    async fn delete(&self, _id: Uuid) -> CatalogResult<bool> {
        unavailable()
    }

    async fn exists(&self, _id: Uuid) -> CatalogResult<bool> {
        unavailable()
    }

    async fn find(
        &self,
        _filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        unavailable()
    }

    async fn get_first(
        &self,
        _filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        unavailable()
    }

    async fn count(&self, _filter: Option<CategoryFilter>) -> CatalogResult<u64> {
        unavailable()
    }

    async fn get_paged(
        &self,
        _page: i64,
        _page_size: i64,
        _filter: Option<CategoryFilter>,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        unavailable()
    }
}

#[tokio::test]
async fn test_storage_failure_returns_500_without_driver_details() {
    let catalog = InMemoryCatalog::new();
    let app = handlers::router(
        CategoryService::new(Unavailable, catalog.clone()),
        ProductService::new(catalog, Unavailable),
    );

    let (status, body) = send(&app, "GET", "/categories", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_OPERATION_FAILED");
    assert_eq!(body["detail"], "Failed to query Category");
    assert!(!body.to_string().contains("connection refused"));
}

// ============================================================================
// OpenAPI
// ============================================================================

#[test]
fn test_delete_responses_document_empty_data() {
    use utoipa::OpenApi;

    let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
    for path in ["/categories/{id}", "/products/{id}"] {
        let mut schema = &doc["paths"][path]["delete"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        if let Some(reference) = schema["$ref"].as_str() {
            let name = reference.trim_start_matches("#/components/schemas/");
            schema = &doc["components"]["schemas"][name];
        }

        let data = &schema["properties"]["data"];
        assert!(!data.is_null(), "{path}: {schema}");
        assert!(!data.to_string().contains("boolean"), "{path}: {data}");
    }
}
