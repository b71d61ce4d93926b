//! Request and response bodies exposed over HTTP.
//!
//! Field names are camelCase on the wire. Prices travel as JSON numbers.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("required"));
    }
    Ok(())
}

/// Prices are stored as `NUMERIC(18,2)`.
pub(crate) fn money(price: Decimal) -> Decimal {
    price.round_dp(2)
}

/// Checked on the rounded value, which is what gets stored.
fn positive(price: &Decimal) -> Result<(), validator::ValidationError> {
    if money(*price) <= Decimal::ZERO {
        return Err(validator::ValidationError::new("range"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Category name is required"),
        length(max = 100, message = "Category name cannot exceed 100 characters")
    )]
    pub name: String,

    #[validate(length(max = 500, message = "Category description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub id: Uuid,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Category name is required"),
        length(max = 100, message = "Category name cannot exceed 100 characters")
    )]
    pub name: String,

    #[validate(length(max = 500, message = "Category description cannot exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Product name is required"),
        length(max = 100, message = "Product name cannot exceed 100 characters")
    )]
    pub name: String,

    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    #[validate(custom(function = "positive", message = "Product price must be greater than 0"))]
    pub price: Decimal,

    #[validate(length(max = 1000, message = "Product description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Uuid,

    #[serde(default)]
    #[validate(
        custom(function = "not_blank", message = "Product name is required"),
        length(max = 100, message = "Product name cannot exceed 100 characters")
    )]
    pub name: String,

    #[serde(default, with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 12.5)]
    #[validate(custom(function = "positive", message = "Product price must be greater than 0"))]
    pub price: Decimal,

    #[validate(length(max = 1000, message = "Product description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub category_id: Uuid,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetailsResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub products: Option<Vec<ProductSummaryResponse>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub product_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub description: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Same shape as [`ProductResponse`]; served by the details endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub description: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummaryResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 9.99)]
    pub price: Decimal,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryProductCount {
    pub category_id: Uuid,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanDeleteResponse {
    pub can_delete: bool,
}

/// One page of results plus navigation metadata.
///
/// `totalPages = ceil(totalCount / pageSize)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PagedResponse<T> {
    /// `page_size` must be positive.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_count: i64) -> Self {
        let total_pages = total_pages(total_count, page_size);
        Self {
            items,
            page,
            page_size,
            total_count,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }
}

pub fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count <= 0 || page_size <= 0 {
        return 0;
    }
    // Never exceeds total_count, so the conversion back is lossless.
    (total_count as u64).div_ceil(page_size as u64) as i64
}

// ---------------------------------------------------------------------------
// Validation outcome
// ---------------------------------------------------------------------------

/// A single field problem. `field` uses the request's display name, e.g. `CategoryId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Field-level messages from a `validator` run, under a display name.
///
/// Rules on one field keep their declaration order.
pub(crate) fn field_errors(
    outcome: &Result<(), validator::ValidationErrors>,
    field: &str,
    display: &str,
) -> Vec<ValidationError> {
    let Err(errors) = outcome else {
        return Vec::new();
    };
    errors
        .field_errors()
        .get(field)
        .map(|list| {
            list.iter()
                .map(|error| {
                    let message = error.message.clone().unwrap_or_else(|| Cow::Owned(error.code.to_string()));
                    ValidationError::new(display, message)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use serde_json::json;

    #[test]
    fn test_paged_metadata() {
        let page = PagedResponse::new(vec![1, 2, 3], 1, 3, 7);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous_page);
        assert!(page.has_next_page);

        let last = PagedResponse::new(vec![7], 3, 3, 7);
        assert!(last.has_previous_page);
        assert!(!last.has_next_page);
    }

    #[test]
    fn test_empty_paged_response() {
        let page: PagedResponse<u8> = PagedResponse::new(Vec::new(), 1, 10, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next_page);
        assert!(!page.has_previous_page);
    }

    #[test]
    fn test_total_pages_with_huge_page_size() {
        assert_eq!(total_pages(2, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, i64::MAX), 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_paged_response_serializes_camel_case() {
        let value = serde_json::to_value(PagedResponse::new(vec!["a"], 1, 10, 1)).unwrap();
        assert_eq!(
            value,
            json!({
                "items": ["a"],
                "page": 1,
                "pageSize": 10,
                "totalCount": 1,
                "totalPages": 1,
                "hasPreviousPage": false,
                "hasNextPage": false
            })
        );
    }

    #[test]
    fn test_product_request_reads_float_price() {
        let category_id = Uuid::now_v7();
        let request: CreateProductRequest = serde_json::from_value(json!({
            "name": "Novel",
            "price": 9.99,
            "categoryId": category_id
        }))
        .unwrap();

        assert_eq!(request.price, dec!(9.99));
        assert_eq!(request.category_id, category_id);
        assert_eq!(request.description, None);
    }

    #[test]
    fn test_missing_fields_default_for_validation() {
        let request: CreateProductRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.name, "");
        assert_eq!(request.price, Decimal::ZERO);
        assert!(request.category_id.is_nil());
    }

    #[test]
    fn test_field_errors_keep_messages() {
        let request = CreateCategoryRequest {
            name: "   ".to_string(),
            description: Some("x".repeat(501)),
        };
        let outcome = request.validate();

        assert_eq!(
            field_errors(&outcome, "name", "Name"),
            vec![ValidationError::new("Name", "Category name is required")]
        );
        assert_eq!(
            field_errors(&outcome, "description", "Description"),
            vec![ValidationError::new(
                "Description",
                "Category description cannot exceed 500 characters"
            )]
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let request = CreateCategoryRequest {
            name: "é".repeat(100),
            description: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        let request = CreateProductRequest {
            name: "Novel".into(),
            price: dec!(-1),
            description: None,
            category_id: Uuid::now_v7(),
        };
        let outcome = request.validate();
        assert_eq!(
            field_errors(&outcome, "price", "Price"),
            vec![ValidationError::new("Price", "Product price must be greater than 0")]
        );
    }

    #[test]
    fn test_price_rounding_to_zero_is_rejected() {
        for price in [dec!(0.004), dec!(0.005)] {
            let request = UpdateProductRequest {
                id: Uuid::now_v7(),
                name: "Dust".into(),
                price,
                description: None,
                category_id: Uuid::now_v7(),
            };
            assert!(request.validate().is_err(), "{price} should be rejected");
        }

        let smallest = CreateProductRequest {
            name: "Dust".into(),
            price: dec!(0.006),
            description: None,
            category_id: Uuid::now_v7(),
        };
        assert!(smallest.validate().is_ok());
        assert_eq!(money(smallest.price), dec!(0.01));
    }
}
