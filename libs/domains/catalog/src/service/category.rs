use std::sync::Arc;

use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::page_total;
use crate::dto::{
    CategoryDetailsResponse, CategoryResponse, CategorySummaryResponse, CreateCategoryRequest,
    PagedResponse, UpdateCategoryRequest, ValidationError, ValidationResult, field_errors,
};
use crate::error::{CatalogError, CatalogResult};
use crate::filter::{CategoryFilter, ProductFilter, ProductInclude};
use crate::mapping;
use crate::models::{Category, Product};
use crate::repository::{Record, Repository};

const NAME_REQUIRED: &str = "Category name is required";
const NAME_TAKEN: &str = "Category name already exists";
const MISSING: &str = "Category does not exist";

/// Field problems of a category request.
struct Findings {
    errors: Vec<ValidationError>,
    duplicate_name: Option<String>,
}

impl Findings {
    /// A duplicate name on its own is a conflict; anything else is a validation failure.
    fn into_result(self) -> CatalogResult<()> {
        match (self.errors.len(), self.duplicate_name) {
            (0, _) => Ok(()),
            (1, Some(name)) => Err(CatalogError::DuplicateCategoryName(name)),
            _ => Err(CatalogError::Validation(self.errors)),
        }
    }
}

/// Service layer for category business logic
pub struct CategoryService<C, P> {
    categories: Arc<C>,
    products: Arc<P>,
}

impl<C, P> Clone for CategoryService<C, P> {
    fn clone(&self) -> Self {
        Self {
            categories: Arc::clone(&self.categories),
            products: Arc::clone(&self.products),
        }
    }
}

impl<C, P> CategoryService<C, P>
where
    C: Repository<Category>,
    P: Repository<Product>,
{
    pub fn new(categories: C, products: P) -> Self {
        Self {
            categories: Arc::new(categories),
            products: Arc::new(products),
        }
    }

    async fn load(&self, id: Uuid) -> CatalogResult<Category> {
        self.categories
            .get_by_id(id, &[])
            .await?
            .ok_or_else(|| CatalogError::not_found(Category::NAME, id))
    }

    async fn product_count(&self, category_id: Uuid) -> CatalogResult<u64> {
        self.products
            .count(Some(ProductFilter::InCategory(category_id)))
            .await
    }

    /// Name and description rules, plus uniqueness against other categories.
    async fn check_fields(
        &self,
        outcome: Result<(), ValidationErrors>,
        name: &str,
        own_id: Option<Uuid>,
    ) -> CatalogResult<Findings> {
        let mut errors = field_errors(&outcome, "name", "Name");
        let mut duplicate_name = None;

        if !name.trim().is_empty() {
            let filter = match own_id {
                Some(id) => CategoryFilter::NameEqualsExcept {
                    name: name.to_string(),
                    id,
                },
                None => CategoryFilter::NameEquals(name.to_string()),
            };
            if self.categories.count(Some(filter)).await? > 0 {
                errors.push(ValidationError::new("Name", NAME_TAKEN));
                duplicate_name = Some(name.to_string());
            }
        }

        errors.extend(field_errors(&outcome, "description", "Description"));
        Ok(Findings {
            errors,
            duplicate_name,
        })
    }

    pub async fn get_category(&self, id: Uuid) -> CatalogResult<CategoryResponse> {
        let category = self.load(id).await?;
        Ok((&category).into())
    }

    /// Category with summaries of its products.
    pub async fn get_category_details(&self, id: Uuid) -> CatalogResult<CategoryDetailsResponse> {
        let category = self.load(id).await?;
        let products = self
            .products
            .find(ProductFilter::InCategory(id), &[ProductInclude::Category])
            .await?;

        Ok(mapping::category_details(&category, Some(products.as_slice())))
    }

    pub async fn get_all_categories(&self) -> CatalogResult<Vec<CategoryResponse>> {
        let categories = self.categories.get_all(&[]).await?;
        Ok(mapping::responses(&categories))
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> CatalogResult<CategoryResponse> {
        self.check_fields(request.validate(), &request.name, None)
            .await?
            .into_result()?;

        let category = self
            .categories
            .create(mapping::new_category(request))
            .await?;
        Ok((&category).into())
    }

    pub async fn update_category(
        &self,
        request: UpdateCategoryRequest,
    ) -> CatalogResult<CategoryResponse> {
        let mut category = self.load(request.id).await?;
        self.check_fields(request.validate(), &request.name, Some(request.id))
            .await?
            .into_result()?;

        mapping::apply_category_update(&mut category, request);
        let category = self.categories.update(category).await?;
        Ok((&category).into())
    }

    /// Refuses while the category still has products.
    pub async fn delete_category(&self, id: Uuid) -> CatalogResult<()> {
        if !self.categories.exists(id).await? {
            return Err(CatalogError::not_found(Category::NAME, id));
        }

        // NOTE: the products foreign key is ON DELETE CASCADE.
        let product_count = self.product_count(id).await?;
        if product_count > 0 {
            return Err(CatalogError::CategoryDeleteNotAllowed {
                category_id: id,
                product_count,
            });
        }

        if !self.categories.delete(id).await? {
            return Err(CatalogError::not_found(Category::NAME, id));
        }
        Ok(())
    }

    pub async fn category_exists(&self, id: Uuid) -> CatalogResult<bool> {
        self.categories.exists(id).await
    }

    pub async fn get_category_by_name(&self, name: &str) -> CatalogResult<CategoryResponse> {
        if name.trim().is_empty() {
            return Err(CatalogError::Validation(vec![ValidationError::new(
                "Name",
                NAME_REQUIRED,
            )]));
        }

        let category = self
            .categories
            .get_first(CategoryFilter::NameEquals(name.to_string()), &[])
            .await?
            .ok_or_else(|| CatalogError::not_found(Category::NAME, name))?;
        Ok((&category).into())
    }

    /// Blank terms list everything.
    pub async fn search_categories(&self, term: &str) -> CatalogResult<Vec<CategoryResponse>> {
        if term.trim().is_empty() {
            return self.get_all_categories().await;
        }

        let categories = self
            .categories
            .find(CategoryFilter::Search(term.to_string()), &[])
            .await?;
        Ok(mapping::responses(&categories))
    }

    /// Categories holding at least one product. One count query per category.
    pub async fn get_categories_with_products(&self) -> CatalogResult<Vec<CategoryResponse>> {
        let categories = self.categories.get_all(&[]).await?;

        let mut with_products = Vec::new();
        for category in &categories {
            if self.product_count(category.id).await? > 0 {
                with_products.push(category.into());
            }
        }
        Ok(with_products)
    }

    pub async fn can_delete_category(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.product_count(id).await? == 0)
    }

    pub async fn get_categories_paged(
        &self,
        page: i64,
        page_size: i64,
    ) -> CatalogResult<PagedResponse<CategoryResponse>> {
        let total = page_total(page, page_size, self.categories.count(None).await?)?;
        let categories = self
            .categories
            .get_paged(page, page_size, None, &[])
            .await?;

        Ok(PagedResponse::new(
            mapping::responses(&categories),
            page,
            page_size,
            total,
        ))
    }

    pub async fn get_category_count(&self) -> CatalogResult<u64> {
        self.categories.count(None).await
    }

    pub async fn get_categories_with_product_count(
        &self,
    ) -> CatalogResult<Vec<CategorySummaryResponse>> {
        let categories = self.categories.get_all(&[]).await?;

        let mut summaries = Vec::with_capacity(categories.len());
        for category in &categories {
            let count = self.product_count(category.id).await?;
            summaries.push(mapping::category_summary(category, count));
        }
        Ok(summaries)
    }

    /// Most populated categories first; ties keep creation order.
    pub async fn get_top_categories_by_product_count(
        &self,
        count: i64,
    ) -> CatalogResult<Vec<CategoryResponse>> {
        if count <= 0 {
            return Ok(Vec::new());
        }

        let categories = self.categories.get_all(&[]).await?;
        let mut counted = Vec::with_capacity(categories.len());
        for category in categories {
            let product_count = self.product_count(category.id).await?;
            counted.push((category, product_count));
        }

        counted.sort_by(|a, b| b.1.cmp(&a.1));
        let take = usize::try_from(count).unwrap_or(usize::MAX);
        Ok(counted
            .iter()
            .take(take)
            .map(|(category, _)| category.into())
            .collect())
    }

    pub async fn validate_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> CatalogResult<ValidationResult> {
        let findings = self
            .check_fields(request.validate(), &request.name, None)
            .await?;
        Ok(ValidationResult::from_errors(findings.errors))
    }

    pub async fn validate_category_update(
        &self,
        request: &UpdateCategoryRequest,
    ) -> CatalogResult<ValidationResult> {
        let mut errors = Vec::new();
        if !self.categories.exists(request.id).await? {
            errors.push(ValidationError::new("Id", MISSING));
        }

        let findings = self
            .check_fields(request.validate(), &request.name, Some(request.id))
            .await?;
        errors.extend(findings.errors);
        Ok(ValidationResult::from_errors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCategoryRepo, MockProductRepo};
    use mockall::predicate;
    use rust_decimal::dec;

    fn service(
        categories: MockCategoryRepo,
        products: MockProductRepo,
    ) -> CategoryService<MockCategoryRepo, MockProductRepo> {
        CategoryService::new(categories, products)
    }

    fn books() -> Category {
        Category::new("Books", "Printed")
    }

    #[tokio::test]
    async fn test_create_category_persists_new_category() {
        let mut categories = MockCategoryRepo::new();
        categories
            .expect_count()
            .with(predicate::eq(Some(CategoryFilter::NameEquals("Books".into()))))
            .times(1)
            .returning(|_| Ok(0));
        categories.expect_create().times(1).returning(Ok);

        let response = service(categories, MockProductRepo::new())
            .create_category(CreateCategoryRequest {
                name: "Books".into(),
                description: None,
            })
            .await
            .unwrap();

        assert_eq!(response.name, "Books");
        assert_eq!(response.description, "");
        assert_eq!(response.created_at, response.updated_at);
    }

    #[tokio::test]
    async fn test_duplicate_name_alone_is_conflict() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_count().returning(|_| Ok(1));
        categories.expect_create().never();

        let err = service(categories, MockProductRepo::new())
            .create_category(CreateCategoryRequest {
                name: "Books".into(),
                description: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateCategoryName(name) if name == "Books"));
    }

    #[tokio::test]
    async fn test_duplicate_name_with_other_errors_is_aggregated() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_count().returning(|_| Ok(1));

        let err = service(categories, MockProductRepo::new())
            .create_category(CreateCategoryRequest {
                name: "Books".into(),
                description: Some("x".repeat(501)),
            })
            .await
            .unwrap_err();

        let errors = match err {
            CatalogError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(
            errors,
            vec![
                ValidationError::new("Name", "Category name already exists"),
                ValidationError::new("Description", "Category description cannot exceed 500 characters"),
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_name_skips_uniqueness_query() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_count().never();

        let err = service(categories, MockProductRepo::new())
            .create_category(CreateCategoryRequest {
                name: "  ".into(),
                description: None,
            })
            .await
            .unwrap_err();

        let errors = match err {
            CatalogError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(errors, vec![ValidationError::new("Name", NAME_REQUIRED)]);
    }

    #[tokio::test]
    async fn test_update_missing_category_is_not_found_before_validation() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_get_by_id().returning(|_, _| Ok(None));
        categories.expect_count().never();

        let err = service(categories, MockProductRepo::new())
            .update_category(UpdateCategoryRequest {
                id: Uuid::now_v7(),
                name: String::new(),
                description: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { entity: "Category", .. }));
    }

    #[tokio::test]
    async fn test_update_excludes_own_name_and_refreshes_timestamp() {
        let existing = books();
        let id = existing.id;
        let created_at = existing.created_at;

        let mut categories = MockCategoryRepo::new();
        categories
            .expect_get_by_id()
            .withf(move |requested, _| *requested == id)
            .returning(move |_, _| Ok(Some(existing.clone())));
        categories
            .expect_count()
            .with(predicate::eq(Some(CategoryFilter::NameEqualsExcept {
                name: "Books".into(),
                id,
            })))
            .returning(|_| Ok(0));
        categories.expect_update().returning(Ok);

        let response = service(categories, MockProductRepo::new())
            .update_category(UpdateCategoryRequest {
                id,
                name: "Books".into(),
                description: Some("Bound".into()),
            })
            .await
            .unwrap();

        assert_eq!(response.description, "Bound");
        assert_eq!(response.created_at, created_at);
        assert!(response.updated_at > created_at);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_products_exist() {
        let category = books();
        let id = category.id;

        let mut categories = MockCategoryRepo::new();
        categories.expect_exists().returning(|_| Ok(true));
        categories.expect_delete().never();
        let mut products = MockProductRepo::new();
        products
            .expect_count()
            .with(predicate::eq(Some(ProductFilter::InCategory(id))))
            .returning(|_| Ok(1));

        let err = service(categories, products)
            .delete_category(id)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::CategoryDeleteNotAllowed { product_count: 1, category_id } if category_id == id
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_category_is_not_found() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_exists().returning(|_| Ok(false));

        let err = service(categories, MockProductRepo::new())
            .delete_category(Uuid::now_v7())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_empty_category() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_exists().returning(|_| Ok(true));
        categories.expect_delete().times(1).returning(|_| Ok(true));
        let mut products = MockProductRepo::new();
        products.expect_count().returning(|_| Ok(0));

        service(categories, products)
            .delete_category(Uuid::now_v7())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_category_by_blank_name_is_validation_error() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_get_first().never();

        let err = service(categories, MockProductRepo::new())
            .get_category_by_name(" ")
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_category_by_unknown_name_is_not_found() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_get_first().returning(|_, _| Ok(None));

        let err = service(categories, MockProductRepo::new())
            .get_category_by_name("Games")
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { key, .. } if key == "Games"));
    }

    #[tokio::test]
    async fn test_blank_search_lists_all() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_find().never();
        categories
            .expect_get_all()
            .returning(|_| Ok(vec![books()]));

        let found = service(categories, MockProductRepo::new())
            .search_categories("")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_top_categories_sorted_by_count_with_stable_ties() {
        let a = Category::new("A", "");
        let b = Category::new("B", "");
        let c = Category::new("C", "");
        let counts = [(a.id, 1u64), (b.id, 3), (c.id, 1)];
        let all = vec![a, b, c];

        let mut categories = MockCategoryRepo::new();
        categories
            .expect_get_all()
            .returning(move |_| Ok(all.clone()));
        let mut products = MockProductRepo::new();
        products.expect_count().returning(move |filter| {
            let Some(ProductFilter::InCategory(id)) = filter else {
                return Ok(0);
            };
            Ok(counts.iter().find(|(cid, _)| *cid == id).map_or(0, |(_, n)| *n))
        });

        let top: Vec<String> = service(categories, products)
            .get_top_categories_by_product_count(2)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(top, ["B", "A"]);
    }

    #[tokio::test]
    async fn test_top_categories_with_non_positive_count_is_empty() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_get_all().never();

        let top = service(categories, MockProductRepo::new())
            .get_top_categories_by_product_count(0)
            .await
            .unwrap();
        assert!(top.is_empty());
    }

    #[tokio::test]
    async fn test_categories_with_product_count() {
        let category = books();
        let mut categories = MockCategoryRepo::new();
        let all = vec![category.clone()];
        categories
            .expect_get_all()
            .returning(move |_| Ok(all.clone()));
        let mut products = MockProductRepo::new();
        products.expect_count().times(1).returning(|_| Ok(2));

        let summaries = service(categories, products)
            .get_categories_with_product_count()
            .await
            .unwrap();

        assert_eq!(summaries, vec![mapping::category_summary(&category, 2)]);
    }

    #[tokio::test]
    async fn test_paged_past_the_end() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_get_paged().never();
        categories.expect_count().returning(|_| Ok(3));

        let err = service(categories, MockProductRepo::new())
            .get_categories_paged(5, 10)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::PaginationOutOfRange {
                requested_page: 5,
                total_pages: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_category_details_carry_product_summaries() {
        let category = books();
        let id = category.id;
        let mut novel = Product::new("Novel", dec!(9.99), "", id);
        novel.category = Some(category.clone());

        let mut categories = MockCategoryRepo::new();
        categories
            .expect_get_by_id()
            .returning(move |_, _| Ok(Some(category.clone())));
        let mut products = MockProductRepo::new();
        products
            .expect_find()
            .withf(move |filter, includes| {
                *filter == ProductFilter::InCategory(id) && includes.contains(&ProductInclude::Category)
            })
            .returning(move |_, _| Ok(vec![novel.clone()]));

        let details = service(categories, products)
            .get_category_details(id)
            .await
            .unwrap();

        let summaries = details.products.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Novel");
        assert_eq!(summaries[0].category_name, "Books");
    }

    #[tokio::test]
    async fn test_validate_update_reports_missing_id() {
        let mut categories = MockCategoryRepo::new();
        categories.expect_exists().returning(|_| Ok(false));
        categories.expect_count().returning(|_| Ok(0));

        let result = service(categories, MockProductRepo::new())
            .validate_category_update(&UpdateCategoryRequest {
                id: Uuid::now_v7(),
                name: "Books".into(),
                description: None,
            })
            .await
            .unwrap();

        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![ValidationError::new("Id", MISSING)]);
    }

    #[tokio::test]
    async fn test_can_delete_category() {
        let mut products = MockProductRepo::new();
        products.expect_count().returning(|_| Ok(0));

        let can_delete = service(MockCategoryRepo::new(), products)
            .can_delete_category(Uuid::now_v7())
            .await
            .unwrap();
        assert!(can_delete);
    }
}
