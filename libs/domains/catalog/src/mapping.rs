//! Conversions between domain records and DTOs.
//!
//! All functions are total. List conversions keep the input order.

use crate::dto::{
    self, CategoryDetailsResponse, CategoryResponse, CategorySummaryResponse, CreateCategoryRequest,
    CreateProductRequest, ProductDetailsResponse, ProductResponse, ProductSummaryResponse,
    UpdateCategoryRequest, UpdateProductRequest,
};
use crate::models::{Category, Product};

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id: product.category_id,
            category_name: product.category_name().to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<&Product> for ProductDetailsResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category_id: product.category_id,
            category_name: product.category_name().to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<&Product> for ProductSummaryResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category_name: product.category_name().to_string(),
        }
    }
}

pub fn category_details(
    category: &Category,
    products: Option<&[Product]>,
) -> CategoryDetailsResponse {
    CategoryDetailsResponse {
        id: category.id,
        name: category.name.clone(),
        description: category.description.clone(),
        created_at: category.created_at,
        updated_at: category.updated_at,
        products: products.map(|products| products.iter().map(Into::into).collect()),
    }
}

pub fn category_summary(category: &Category, product_count: u64) -> CategorySummaryResponse {
    CategorySummaryResponse {
        id: category.id,
        name: category.name.clone(),
        product_count,
    }
}

pub fn responses<'a, T, R>(items: impl IntoIterator<Item = &'a T>) -> Vec<R>
where
    T: 'a,
    R: From<&'a T>,
{
    items.into_iter().map(R::from).collect()
}

pub fn new_category(request: CreateCategoryRequest) -> Category {
    Category::new(request.name, request.description.unwrap_or_default())
}

pub fn new_product(request: CreateProductRequest) -> Product {
    Product::new(
        request.name,
        dto::money(request.price),
        request.description.unwrap_or_default(),
        request.category_id,
    )
}

/// Replaces the mutable fields and refreshes `updated_at`.
pub fn apply_category_update(category: &mut Category, request: UpdateCategoryRequest) {
    category.name = request.name;
    category.description = request.description.unwrap_or_default();
    category.touch();
}

/// Replaces the mutable fields and refreshes `updated_at`.
///
/// A loaded category is dropped since `category_id` may have changed.
pub fn apply_product_update(product: &mut Product, request: UpdateProductRequest) {
    product.name = request.name;
    product.price = dto::money(request.price);
    product.description = request.description.unwrap_or_default();
    product.category_id = request.category_id;
    product.category = None;
    product.touch();
}
