use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{CategoryFilter, CategoryInclude, ProductFilter, ProductInclude};
use crate::models::{Category, Product};

/// A persisted catalog entity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Entity name used in errors and logs
    const NAME: &'static str;
    type Filter: Clone + fmt::Debug + Send + Sync + 'static;
    type Include: Copy + fmt::Debug + PartialEq + Send + Sync + 'static;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    /// In-process evaluation of `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;
}

/// Generic data access over one entity type.
///
/// Every mutating call commits on its own. Listings are ordered by
/// `(created_at, id)`.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn get_all(&self, includes: &[T::Include]) -> CatalogResult<Vec<T>>;

    async fn get_by_id(&self, id: Uuid, includes: &[T::Include]) -> CatalogResult<Option<T>>;

    async fn create(&self, entity: T) -> CatalogResult<T>;

    /// Full replace by id. Fails with `NotFound` when the row is gone.
    async fn update(&self, entity: T) -> CatalogResult<T>;

    /// `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> CatalogResult<bool>;

    async fn exists(&self, id: Uuid) -> CatalogResult<bool>;

    async fn find(&self, filter: T::Filter, includes: &[T::Include]) -> CatalogResult<Vec<T>>;

    async fn get_first(
        &self,
        filter: T::Filter,
        includes: &[T::Include],
    ) -> CatalogResult<Option<T>>;

    async fn count(&self, filter: Option<T::Filter>) -> CatalogResult<u64>;

    /// 1-indexed page; no upper bound check.
    async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<T::Filter>,
        includes: &[T::Include],
    ) -> CatalogResult<Vec<T>>;
}

/// Rejects non-positive paging arguments.
pub(crate) fn check_page(page: i64, page_size: i64) -> CatalogResult<(u64, u64)> {
    if page <= 0 {
        return Err(CatalogError::InvalidArgument(
            "Page must be greater than 0".to_string(),
        ));
    }
    if page_size <= 0 {
        return Err(CatalogError::InvalidArgument(
            "Page size must be greater than 0".to_string(),
        ));
    }
    Ok((page as u64, page_size as u64))
}

fn sorted<T: Record>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().collect();
    items.sort_by_key(|item| (item.created_at(), item.id()));
    items
}

fn page_of<T>(items: Vec<T>, page: u64, page_size: u64) -> Vec<T> {
    let offset = database::page_offset(page, page_size);
    items
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(page_size).unwrap_or(usize::MAX))
        .collect()
}

/// In-memory catalog store for development and tests.
///
/// One instance backs both `Repository<Category>` and `Repository<Product>`.
/// Deleting a category removes its products, like the storage-level foreign key.
/// Locks are always taken categories first, then products.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select_categories(&self, filter: Option<&CategoryFilter>) -> Vec<Category> {
        let categories = self.categories.read().await;
        sorted(
            categories
                .values()
                .filter(|c| filter.is_none_or(|f| c.matches(f)))
                .cloned(),
        )
    }

    async fn select_products(
        &self,
        filter: Option<&ProductFilter>,
        includes: &[ProductInclude],
    ) -> Vec<Product> {
        let with_category = includes.contains(&ProductInclude::Category);
        let categories = self.categories.read().await;
        let products = self.products.read().await;

        sorted(
            products
                .values()
                .filter(|p| filter.is_none_or(|f| p.matches(f)))
                .cloned()
                .map(|mut product| {
                    if with_category {
                        product.category = categories.get(&product.category_id).cloned();
                    }
                    product
                }),
        )
    }
}

fn missing_category(operation: &'static str, category_id: Uuid) -> CatalogError {
    CatalogError::repository(operation, Product::NAME)(DbErr::Custom(format!(
        "foreign key violation: category {} does not exist",
        category_id
    )))
}

#[async_trait]
impl Repository<Category> for InMemoryCatalog {
    async fn get_all(&self, _includes: &[CategoryInclude]) -> CatalogResult<Vec<Category>> {
        Ok(self.select_categories(None).await)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn create(&self, category: Category) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(CatalogError::repository("create", Category::NAME)(
                DbErr::Custom(format!("duplicate key: category {}", category.id)),
            ));
        }
        categories.insert(category.id, category.clone());

        tracing::info!(category_id = %category.id, "Created category");
        Ok(category)
    }

    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let mut categories = self.categories.write().await;
        let Some(stored) = categories.get_mut(&category.id) else {
            return Err(CatalogError::not_found(Category::NAME, category.id));
        };
        *stored = category.clone();

        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let mut categories = self.categories.write().await;
        let mut products = self.products.write().await;

        if categories.remove(&id).is_none() {
            return Ok(false);
        }
        let before = products.len();
        products.retain(|_, product| product.category_id != id);

        tracing::info!(
            category_id = %id,
            cascaded_products = before - products.len(),
            "Deleted category"
        );
        Ok(true)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.categories.read().await.contains_key(&id))
    }

    async fn find(
        &self,
        filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        Ok(self.select_categories(Some(&filter)).await)
    }

    async fn get_first(
        &self,
        filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        Ok(self.select_categories(Some(&filter)).await.into_iter().next())
    }

    async fn count(&self, filter: Option<CategoryFilter>) -> CatalogResult<u64> {
        let categories = self.categories.read().await;
        let count = categories
            .values()
            .filter(|c| filter.as_ref().is_none_or(|f| c.matches(f)))
            .count();
        Ok(count as u64)
    }

    async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<CategoryFilter>,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        let (page, page_size) = check_page(page, page_size)?;
        let categories = self.select_categories(filter.as_ref()).await;
        Ok(page_of(categories, page, page_size))
    }
}

#[async_trait]
impl Repository<Product> for InMemoryCatalog {
    async fn get_all(&self, includes: &[ProductInclude]) -> CatalogResult<Vec<Product>> {
        Ok(self.select_products(None, includes).await)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        includes: &[ProductInclude],
    ) -> CatalogResult<Option<Product>> {
        let categories = self.categories.read().await;
        let products = self.products.read().await;

        Ok(products.get(&id).cloned().map(|mut product| {
            if includes.contains(&ProductInclude::Category) {
                product.category = categories.get(&product.category_id).cloned();
            }
            product
        }))
    }

    async fn create(&self, mut product: Product) -> CatalogResult<Product> {
        let categories = self.categories.read().await;
        let mut products = self.products.write().await;

        if !categories.contains_key(&product.category_id) {
            return Err(missing_category("create", product.category_id));
        }
        if products.contains_key(&product.id) {
            return Err(CatalogError::repository("create", Product::NAME)(
                DbErr::Custom(format!("duplicate key: product {}", product.id)),
            ));
        }
        product.category = None;
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, category_id = %product.category_id, "Created product");
        Ok(product)
    }

    async fn update(&self, mut product: Product) -> CatalogResult<Product> {
        let categories = self.categories.read().await;
        let mut products = self.products.write().await;

        if !products.contains_key(&product.id) {
            return Err(CatalogError::not_found(Product::NAME, product.id));
        }
        if !categories.contains_key(&product.category_id) {
            return Err(missing_category("update", product.category_id));
        }
        product.category = None;
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let removed = self.products.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(removed)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        Ok(self.products.read().await.contains_key(&id))
    }

    async fn find(
        &self,
        filter: ProductFilter,
        includes: &[ProductInclude],
    ) -> CatalogResult<Vec<Product>> {
        Ok(self.select_products(Some(&filter), includes).await)
    }

    async fn get_first(
        &self,
        filter: ProductFilter,
        includes: &[ProductInclude],
    ) -> CatalogResult<Option<Product>> {
        Ok(self
            .select_products(Some(&filter), includes)
            .await
            .into_iter()
            .next())
    }

    async fn count(&self, filter: Option<ProductFilter>) -> CatalogResult<u64> {
        let products = self.products.read().await;
        let count = products
            .values()
            .filter(|p| filter.as_ref().is_none_or(|f| p.matches(f)))
            .count();
        Ok(count as u64)
    }

    async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<ProductFilter>,
        includes: &[ProductInclude],
    ) -> CatalogResult<Vec<Product>> {
        let (page, page_size) = check_page(page, page_size)?;
        let products = self.select_products(filter.as_ref(), includes).await;
        Ok(page_of(products, page, page_size))
    }
}

#[cfg(test)]
mockall::mock! {
    pub CategoryRepo {}

    #[async_trait]
    impl Repository<Category> for CategoryRepo {
        async fn get_all(&self, includes: &[CategoryInclude]) -> CatalogResult<Vec<Category>>;
        async fn get_by_id(&self, id: Uuid, includes: &[CategoryInclude]) -> CatalogResult<Option<Category>>;
        async fn create(&self, entity: Category) -> CatalogResult<Category>;
        async fn update(&self, entity: Category) -> CatalogResult<Category>;
        async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
        async fn exists(&self, id: Uuid) -> CatalogResult<bool>;
        async fn find(&self, filter: CategoryFilter, includes: &[CategoryInclude]) -> CatalogResult<Vec<Category>>;
        async fn get_first(&self, filter: CategoryFilter, includes: &[CategoryInclude]) -> CatalogResult<Option<Category>>;
        async fn count(&self, filter: Option<CategoryFilter>) -> CatalogResult<u64>;
        async fn get_paged(
            &self,
            page: i64,
            page_size: i64,
            filter: Option<CategoryFilter>,
            includes: &[CategoryInclude],
        ) -> CatalogResult<Vec<Category>>;
    }
}

#[cfg(test)]
mockall::mock! {
    pub ProductRepo {}

    #[async_trait]
    impl Repository<Product> for ProductRepo {
        async fn get_all(&self, includes: &[ProductInclude]) -> CatalogResult<Vec<Product>>;
        async fn get_by_id(&self, id: Uuid, includes: &[ProductInclude]) -> CatalogResult<Option<Product>>;
        async fn create(&self, entity: Product) -> CatalogResult<Product>;
        async fn update(&self, entity: Product) -> CatalogResult<Product>;
        async fn delete(&self, id: Uuid) -> CatalogResult<bool>;
        async fn exists(&self, id: Uuid) -> CatalogResult<bool>;
        async fn find(&self, filter: ProductFilter, includes: &[ProductInclude]) -> CatalogResult<Vec<Product>>;
        async fn get_first(&self, filter: ProductFilter, includes: &[ProductInclude]) -> CatalogResult<Option<Product>>;
        async fn count(&self, filter: Option<ProductFilter>) -> CatalogResult<u64>;
        async fn get_paged(
            &self,
            page: i64,
            page_size: i64,
            filter: Option<ProductFilter>,
            includes: &[ProductInclude],
        ) -> CatalogResult<Vec<Product>>;
    }
}
