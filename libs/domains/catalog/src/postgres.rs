use async_trait::async_trait;
use database::{BaseRepository, page_offset};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use crate::{
    entity::{category, product},
    error::{CatalogError, CatalogResult},
    filter::{CategoryFilter, CategoryInclude, ProductFilter, ProductInclude, like_pattern},
    models::{Category, Product},
    repository::{Record, Repository, check_page},
};

fn category_condition(filter: &CategoryFilter) -> Condition {
    match filter {
        CategoryFilter::NameEquals(name) => {
            Condition::all().add(category::Column::Name.eq(name.as_str()))
        }
        CategoryFilter::NameEqualsExcept { name, id } => Condition::all()
            .add(category::Column::Name.eq(name.as_str()))
            .add(category::Column::Id.ne(*id)),
        CategoryFilter::Search(term) => {
            let pattern = like_pattern(term);
            Condition::any()
                .add(category::Column::Name.like(pattern.as_str()))
                .add(category::Column::Description.like(pattern.as_str()))
        }
    }
}

fn product_condition(filter: &ProductFilter) -> Condition {
    match filter {
        ProductFilter::InCategory(category_id) => {
            Condition::all().add(product::Column::CategoryId.eq(*category_id))
        }
        ProductFilter::PriceBetween { min, max } => {
            Condition::all().add(product::Column::Price.between(*min, *max))
        }
        ProductFilter::Search(term) => {
            let pattern = like_pattern(term);
            Condition::any()
                .add(product::Column::Name.like(pattern.as_str()))
                .add(product::Column::Description.like(pattern.as_str()))
        }
    }
}

/// `RecordNotUpdated` means the row vanished between load and save.
fn update_error(entity: &'static str, id: Uuid) -> impl FnOnce(DbErr) -> CatalogError {
    move |err| match err {
        DbErr::RecordNotUpdated => CatalogError::not_found(entity, id),
        other => CatalogError::repository("update", entity)(other),
    }
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    base: BaseRepository<category::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn ordered(&self, filter: Option<&CategoryFilter>) -> Select<category::Entity> {
        self.base
            .select(filter.map(category_condition))
            .order_by_asc(category::Column::CreatedAt)
            .order_by_asc(category::Column::Id)
    }
}

#[async_trait]
impl Repository<Category> for PgCategoryRepository {
    async fn get_all(&self, _includes: &[CategoryInclude]) -> CatalogResult<Vec<Category>> {
        let models = self
            .base
            .find_all(self.ordered(None))
            .await
            .map_err(CatalogError::repository("list", Category::NAME))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(CatalogError::repository("get", Category::NAME))?;

        Ok(model.map(Into::into))
    }

    async fn create(&self, category: Category) -> CatalogResult<Category> {
        let active_model: category::ActiveModel = (&category).into();
        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(CatalogError::repository("create", Category::NAME))?;

        tracing::info!(category_id = %model.id, "Created category");
        Ok(model.into())
    }

    async fn update(&self, category: Category) -> CatalogResult<Category> {
        let active_model: category::ActiveModel = (&category).into();
        let model = self
            .base
            .update(active_model)
            .await
            .map_err(update_error(Category::NAME, category.id))?;

        tracing::info!(category_id = %model.id, "Updated category");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let rows = self
            .base
            .delete_by_id(id)
            .await
            .map_err(CatalogError::repository("delete", Category::NAME))?;

        if rows > 0 {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(rows > 0)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        self.base
            .exists(id)
            .await
            .map_err(CatalogError::repository("check", Category::NAME))
    }

    async fn find(
        &self,
        filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        let models = self
            .base
            .find_all(self.ordered(Some(&filter)))
            .await
            .map_err(CatalogError::repository("find", Category::NAME))?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_first(
        &self,
        filter: CategoryFilter,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Option<Category>> {
        let model = self
            .base
            .find_first(self.ordered(Some(&filter)))
            .await
            .map_err(CatalogError::repository("find", Category::NAME))?;

        Ok(model.map(Into::into))
    }

    async fn count(&self, filter: Option<CategoryFilter>) -> CatalogResult<u64> {
        self.base
            .count(filter.as_ref().map(category_condition))
            .await
            .map_err(CatalogError::repository("count", Category::NAME))
    }

    async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<CategoryFilter>,
        _includes: &[CategoryInclude],
    ) -> CatalogResult<Vec<Category>> {
        let (page, page_size) = check_page(page, page_size)?;
        let models = self
            .base
            .find_page(self.ordered(filter.as_ref()), page, page_size)
            .await
            .map_err(CatalogError::repository("page", Category::NAME))?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone)]
pub struct PgProductRepository {
    base: BaseRepository<product::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn ordered(&self, filter: Option<&ProductFilter>) -> Select<product::Entity> {
        self.base
            .select(filter.map(product_condition))
            .order_by_asc(product::Column::CreatedAt)
            .order_by_asc(product::Column::Id)
    }

    /// Runs `query`, joining the category when requested.
    async fn load(
        &self,
        query: Select<product::Entity>,
        includes: &[ProductInclude],
        operation: &'static str,
    ) -> CatalogResult<Vec<Product>> {
        let rows = if includes.contains(&ProductInclude::Category) {
            query
                .find_also_related(category::Entity)
                .all(self.base.db())
                .await
                .map_err(CatalogError::repository(operation, Product::NAME))?
                .into_iter()
                .map(|(model, related)| model.into_product(related))
                .collect()
        } else {
            self.base
                .find_all(query)
                .await
                .map_err(CatalogError::repository(operation, Product::NAME))?
                .into_iter()
                .map(Into::into)
                .collect()
        };
        Ok(rows)
    }
}

#[async_trait]
impl Repository<Product> for PgProductRepository {
    async fn get_all(&self, includes: &[ProductInclude]) -> CatalogResult<Vec<Product>> {
        self.load(self.ordered(None), includes, "list").await
    }

    async fn get_by_id(
        &self,
        id: Uuid,
        includes: &[ProductInclude],
    ) -> CatalogResult<Option<Product>> {
        let query = product::Entity::find_by_id(id);
        Ok(self.load(query, includes, "get").await?.into_iter().next())
    }

    async fn create(&self, product: Product) -> CatalogResult<Product> {
        let active_model: product::ActiveModel = (&product).into();
        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(CatalogError::repository("create", Product::NAME))?;

        tracing::info!(product_id = %model.id, category_id = %model.category_id, "Created product");
        Ok(model.into())
    }

    async fn update(&self, product: Product) -> CatalogResult<Product> {
        let active_model: product::ActiveModel = (&product).into();
        let model = self
            .base
            .update(active_model)
            .await
            .map_err(update_error(Product::NAME, product.id))?;

        tracing::info!(product_id = %model.id, "Updated product");
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> CatalogResult<bool> {
        let rows = self
            .base
            .delete_by_id(id)
            .await
            .map_err(CatalogError::repository("delete", Product::NAME))?;

        if rows > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(rows > 0)
    }

    async fn exists(&self, id: Uuid) -> CatalogResult<bool> {
        self.base
            .exists(id)
            .await
            .map_err(CatalogError::repository("check", Product::NAME))
    }

    async fn find(
        &self,
        filter: ProductFilter,
        includes: &[ProductInclude],
    ) -> CatalogResult<Vec<Product>> {
        self.load(self.ordered(Some(&filter)), includes, "find").await
    }

    async fn get_first(
        &self,
        filter: ProductFilter,
        includes: &[ProductInclude],
    ) -> CatalogResult<Option<Product>> {
        let query = self.ordered(Some(&filter)).limit(1);
        Ok(self.load(query, includes, "find").await?.into_iter().next())
    }

    async fn count(&self, filter: Option<ProductFilter>) -> CatalogResult<u64> {
        self.base
            .count(filter.as_ref().map(product_condition))
            .await
            .map_err(CatalogError::repository("count", Product::NAME))
    }

    async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<ProductFilter>,
        includes: &[ProductInclude],
    ) -> CatalogResult<Vec<Product>> {
        let (page, page_size) = check_page(page, page_size)?;
        let query = self
            .ordered(filter.as_ref())
            .offset(page_offset(page, page_size))
            .limit(page_size);
        self.load(query, includes, "page").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryFilter, QueryTrait};

    fn sql(filter: Condition) -> String {
        category::Entity::find()
            .filter(filter)
            .build(DatabaseBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_search_condition_escapes_like_wildcards() {
        let statement = sql(category_condition(&CategoryFilter::Search("50%".into())));
        assert!(statement.contains(r#""categories"."name" LIKE"#));
        assert!(statement.contains(r#""categories"."description" LIKE"#));
        assert!(statement.contains(" OR "));
    }

    #[test]
    fn test_name_equals_except_excludes_id() {
        let id = Uuid::now_v7();
        let statement = sql(category_condition(&CategoryFilter::NameEqualsExcept {
            name: "Books".into(),
            id,
        }));
        assert!(statement.contains(r#""categories"."name" = 'Books'"#));
        assert!(statement.contains(r#""categories"."id" <>"#));
    }

    #[test]
    fn test_price_between_condition() {
        let statement = product::Entity::find()
            .filter(product_condition(&ProductFilter::PriceBetween {
                min: dec!(1),
                max: dec!(10),
            }))
            .build(DatabaseBackend::Postgres)
            .to_string();
        assert!(statement.contains("BETWEEN"));
    }

    #[tokio::test]
    async fn test_get_by_id_maps_model() {
        let now = crate::models::now();
        let model = category::Model {
            id: Uuid::now_v7(),
            name: "Books".into(),
            description: "".into(),
            created_at: now.into(),
            updated_at: now.into(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();
        let repository = PgCategoryRepository::new(db);

        let category = repository.get_by_id(model.id, &[]).await.unwrap().unwrap();
        assert_eq!(category.name, "Books");
        assert_eq!(category.created_at, now);
    }

    #[tokio::test]
    async fn test_update_of_vanished_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let repository = PgCategoryRepository::new(db);

        let err = repository
            .update(Category::new("Books", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { entity: "Category", .. }));
    }

    #[tokio::test]
    async fn test_storage_errors_are_wrapped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("boom".into())])
            .into_connection();
        let repository = PgProductRepository::new(db);

        let err = repository.get_all(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Repository {
                operation: "list",
                entity: "Product",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cloned_repository_shares_the_connection() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let original = PgCategoryRepository::new(db);
        let cloned = original.clone();
        drop(original);

        assert!(cloned.get_all(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_offset_stays_within_bigint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();
        let repository = PgProductRepository::new(db.clone());

        let page = repository
            .get_paged(3, i64::MAX, None, &[])
            .await
            .unwrap();
        assert!(page.is_empty());

        let log = format!("{:?}", db.into_transaction_log());
        let unclamped = 2 * i64::MAX as u64;
        assert!(log.contains(&i64::MAX.to_string()), "{log}");
        assert!(!log.contains(&unclamped.to_string()), "{log}");
    }

    #[test]
    fn test_record_names() {
        assert_eq!(<Category as Record>::NAME, "Category");
        assert_eq!(<Product as Record>::NAME, "Product");
    }
}
