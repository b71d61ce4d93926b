//! Generic SeaORM data access shared by the domain repositories.
//!
//! `BaseRepository<E>` is instantiated once per entity type; domain crates wrap
//! it in their own repository types and translate `DbErr` into domain errors.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryFilter, QuerySelect, Select,
};

type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Offset of a 1-indexed page. Callers validate `page >= 1` first.
///
/// Capped at `i64::MAX`, the largest OFFSET PostgreSQL accepts.
pub fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1)
        .saturating_mul(page_size)
        .min(i64::MAX as u64)
}

pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// `SELECT` over the entity, optionally filtered.
    pub fn select(&self, condition: Option<Condition>) -> Select<E> {
        match condition {
            Some(condition) => E::find().filter(condition),
            None => E::find(),
        }
    }

    pub async fn find_by_id<K>(&self, id: K) -> Result<Option<E::Model>, DbErr>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        E::find_by_id(id).one(&self.db).await
    }

    pub async fn find_all(&self, query: Select<E>) -> Result<Vec<E::Model>, DbErr> {
        query.all(&self.db).await
    }

    pub async fn find_first(&self, query: Select<E>) -> Result<Option<E::Model>, DbErr> {
        query.one(&self.db).await
    }

    /// One page of `query`; ordering is the caller's responsibility.
    pub async fn find_page(
        &self,
        query: Select<E>,
        page: u64,
        page_size: u64,
    ) -> Result<Vec<E::Model>, DbErr> {
        query
            .offset(page_offset(page, page_size))
            .limit(page_size)
            .all(&self.db)
            .await
    }

    pub async fn insert<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&self.db).await
    }

    pub async fn update<A>(&self, model: A) -> Result<E::Model, DbErr>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.update(&self.db).await
    }

    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete_by_id<K>(&self, id: K) -> Result<u64, DbErr>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn exists<K>(&self, id: K) -> Result<bool, DbErr>
    where
        K: Into<PrimaryKeyOf<E>>,
    {
        Ok(E::find_by_id(id).count(&self.db).await? > 0)
    }

    pub async fn count(&self, condition: Option<Condition>) -> Result<u64, DbErr> {
        self.select(condition).count(&self.db).await
    }
}
