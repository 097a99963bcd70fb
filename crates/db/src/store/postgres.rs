//! PostgreSQL adapter over [`CarItemRepo`].

use async_trait::async_trait;
use carlot_core::listing::{CarFilter, SortSpec};
use carlot_core::pagination::PageWindow;
use carlot_core::types::DbId;

use super::CarItemStore;
use crate::models::car_item::{
    CarItem, CarItemPatch, CarItemSummary, DeletedCarItem, NewCarItem, SegmentCount,
};
use crate::repositories::CarItemRepo;
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgCarItemStore {
    pool: DbPool,
}

impl PgCarItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarItemStore for PgCarItemStore {
    async fn count(&self, filter: &CarFilter) -> Result<u64, sqlx::Error> {
        let count = CarItemRepo::count(&self.pool, filter).await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    async fn find(
        &self,
        filter: &CarFilter,
        sort: Option<&SortSpec>,
        window: PageWindow,
    ) -> Result<Vec<CarItemSummary>, sqlx::Error> {
        CarItemRepo::find(&self.pool, filter, sort, window).await
    }

    async fn find_deleted(&self) -> Result<Vec<DeletedCarItem>, sqlx::Error> {
        CarItemRepo::list_deleted(&self.pool).await
    }

    async fn find_active(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        CarItemRepo::find_active(&self.pool, id).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        CarItemRepo::find_by_id(&self.pool, id).await
    }

    async fn exists_with_identity(
        &self,
        version: &str,
        name: &str,
        brand: &str,
    ) -> Result<bool, sqlx::Error> {
        CarItemRepo::exists_with_identity(&self.pool, version, name, brand).await
    }

    async fn insert(&self, input: &NewCarItem) -> Result<CarItem, sqlx::Error> {
        CarItemRepo::create(&self.pool, input).await
    }

    async fn update(&self, id: DbId, patch: &CarItemPatch) -> Result<bool, sqlx::Error> {
        CarItemRepo::update(&self.pool, id, patch).await
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        CarItemRepo::soft_delete(&self.pool, id).await
    }

    async fn soft_delete_many(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        CarItemRepo::soft_delete_many(&self.pool, ids).await
    }

    async fn count_by_segment(&self) -> Result<Vec<SegmentCount>, sqlx::Error> {
        CarItemRepo::count_by_segment(&self.pool).await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
