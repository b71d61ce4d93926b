use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::page_total;
use crate::dto::{
    CreateProductRequest, PagedResponse, ProductDetailsResponse, ProductResponse,
    UpdateProductRequest, ValidationError, ValidationResult, field_errors,
};
use crate::error::{CatalogError, CatalogResult};
use crate::filter::{ProductFilter, ProductInclude};
use crate::mapping;
use crate::models::{Category, Product};
use crate::repository::{Record, Repository};

const WITH_CATEGORY: &[ProductInclude] = &[ProductInclude::Category];

/// Service layer for product business logic
pub struct ProductService<P, C> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P, C> Clone for ProductService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}

impl<P, C> ProductService<P, C>
where
    P: Repository<Product>,
    C: Repository<Category>,
{
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    /// Product with its category loaded.
    async fn load(&self, id: Uuid) -> CatalogResult<Product> {
        self.products
            .get_by_id(id, WITH_CATEGORY)
            .await?
            .ok_or_else(|| CatalogError::not_found(Product::NAME, id))
    }

    async fn check_fields(
        &self,
        outcome: Result<(), ValidationErrors>,
        category_id: Uuid,
    ) -> CatalogResult<Vec<ValidationError>> {
        let mut errors = field_errors(&outcome, "name", "Name");
        errors.extend(field_errors(&outcome, "price", "Price"));
        errors.extend(field_errors(&outcome, "description", "Description"));
        if !self.categories.exists(category_id).await? {
            errors.push(ValidationError::new("CategoryId", "Category does not exist"));
        }
        Ok(errors)
    }

    async fn ensure_valid(
        &self,
        outcome: Result<(), ValidationErrors>,
        category_id: Uuid,
    ) -> CatalogResult<()> {
        let errors = self.check_fields(outcome, category_id).await?;
        if !errors.is_empty() {
            return Err(CatalogError::Validation(errors));
        }
        Ok(())
    }

    pub async fn get_product(&self, id: Uuid) -> CatalogResult<ProductResponse> {
        let product = self.load(id).await?;
        Ok((&product).into())
    }

    pub async fn get_product_details(&self, id: Uuid) -> CatalogResult<ProductDetailsResponse> {
        let product = self.load(id).await?;
        Ok((&product).into())
    }

    pub async fn get_all_products(&self) -> CatalogResult<Vec<ProductResponse>> {
        let products = self.products.get_all(WITH_CATEGORY).await?;
        Ok(mapping::responses(&products))
    }

    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> CatalogResult<ProductResponse> {
        self.ensure_valid(request.validate(), request.category_id)
            .await?;

        let created = self.products.create(mapping::new_product(request)).await?;
        let product = self.load(created.id).await?;
        Ok((&product).into())
    }

    pub async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> CatalogResult<ProductResponse> {
        let mut product = self
            .products
            .get_by_id(request.id, &[])
            .await?
            .ok_or_else(|| CatalogError::not_found(Product::NAME, request.id))?;
        self.ensure_valid(request.validate(), request.category_id)
            .await?;

        mapping::apply_product_update(&mut product, request);
        let updated = self.products.update(product).await?;
        let product = self.load(updated.id).await?;
        Ok((&product).into())
    }

    pub async fn delete_product(&self, id: Uuid) -> CatalogResult<()> {
        if !self.products.delete(id).await? {
            return Err(CatalogError::not_found(Product::NAME, id));
        }
        Ok(())
    }

    pub async fn product_exists(&self, id: Uuid) -> CatalogResult<bool> {
        self.products.exists(id).await
    }

    pub async fn get_products_by_category(
        &self,
        category_id: Uuid,
    ) -> CatalogResult<Vec<ProductResponse>> {
        let products = self
            .products
            .find(ProductFilter::InCategory(category_id), WITH_CATEGORY)
            .await?;
        Ok(mapping::responses(&products))
    }

    /// Inclusive on both ends.
    pub async fn get_products_by_price_range(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> CatalogResult<Vec<ProductResponse>> {
        if min > max {
            return Err(CatalogError::InvalidArgument(format!(
                "Minimum price {} cannot be greater than maximum price {}",
                min, max
            )));
        }

        let products = self
            .products
            .find(ProductFilter::PriceBetween { min, max }, WITH_CATEGORY)
            .await?;
        Ok(mapping::responses(&products))
    }

    /// Blank terms list everything.
    pub async fn search_products(&self, term: &str) -> CatalogResult<Vec<ProductResponse>> {
        if term.trim().is_empty() {
            return self.get_all_products().await;
        }

        let products = self
            .products
            .find(ProductFilter::Search(term.to_string()), WITH_CATEGORY)
            .await?;
        Ok(mapping::responses(&products))
    }

    pub async fn get_products_paged(
        &self,
        page: i64,
        page_size: i64,
    ) -> CatalogResult<PagedResponse<ProductResponse>> {
        let total = page_total(page, page_size, self.products.count(None).await?)?;
        let products = self
            .products
            .get_paged(page, page_size, None, WITH_CATEGORY)
            .await?;

        Ok(PagedResponse::new(
            mapping::responses(&products),
            page,
            page_size,
            total,
        ))
    }

    pub async fn get_product_count(&self) -> CatalogResult<u64> {
        self.products.count(None).await
    }

    pub async fn get_product_count_by_category(&self, category_id: Uuid) -> CatalogResult<u64> {
        self.products
            .count(Some(ProductFilter::InCategory(category_id)))
            .await
    }

    pub async fn validate_product(
        &self,
        request: &CreateProductRequest,
    ) -> CatalogResult<ValidationResult> {
        let errors = self
            .check_fields(request.validate(), request.category_id)
            .await?;
        Ok(ValidationResult::from_errors(errors))
    }

    pub async fn validate_product_update(
        &self,
        request: &UpdateProductRequest,
    ) -> CatalogResult<ValidationResult> {
        let mut errors = Vec::new();
        if !self.products.exists(request.id).await? {
            errors.push(ValidationError::new("Id", "Product does not exist"));
        }

        errors.extend(
            self.check_fields(request.validate(), request.category_id)
                .await?,
        );
        Ok(ValidationResult::from_errors(errors))
    }
}
