//! Storage seam for the car catalog.
//!
//! Handlers only see [`CarItemStore`]. [`PgCarItemStore`] backs production;
//! [`InMemoryCarItemStore`] backs tests and database-less local runs.

use async_trait::async_trait;
use carlot_core::listing::{CarFilter, SortSpec};
use carlot_core::pagination::PageWindow;
use carlot_core::types::DbId;

use crate::models::car_item::{
    CarItem, CarItemPatch, CarItemSummary, DeletedCarItem, NewCarItem, SegmentCount,
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCarItemStore;
pub use postgres::PgCarItemStore;

/// Catalog operations the HTTP layer needs from a store.
///
/// Nothing here is transactional: callers combining calls (exists-then-insert,
/// bulk updates) get no atomicity across them.
#[async_trait]
pub trait CarItemStore: Send + Sync {
    /// Number of items matching `filter`.
    async fn count(&self, filter: &CarFilter) -> Result<u64, sqlx::Error>;

    /// One page of items matching `filter` in listing projection.
    async fn find(
        &self,
        filter: &CarFilter,
        sort: Option<&SortSpec>,
        window: PageWindow,
    ) -> Result<Vec<CarItemSummary>, sqlx::Error>;

    /// All soft-deleted items.
    async fn find_deleted(&self) -> Result<Vec<DeletedCarItem>, sqlx::Error>;

    /// A live item by id.
    async fn find_active(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error>;

    /// An item by id, deleted or not.
    async fn find_by_id(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error>;

    /// Whether any item already has this (version, name, brand).
    async fn exists_with_identity(
        &self,
        version: &str,
        name: &str,
        brand: &str,
    ) -> Result<bool, sqlx::Error>;

    async fn insert(&self, input: &NewCarItem) -> Result<CarItem, sqlx::Error>;

    /// Returns `false` when no item has `id`.
    async fn update(&self, id: DbId, patch: &CarItemPatch) -> Result<bool, sqlx::Error>;

    /// Flag one item deleted. Returns `false` when nothing changed.
    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    /// Flag every listed item deleted. Returns how many changed.
    async fn soft_delete_many(&self, ids: &[DbId]) -> Result<u64, sqlx::Error>;

    /// Live item counts per vehicle segment, in no particular order.
    async fn count_by_segment(&self) -> Result<Vec<SegmentCount>, sqlx::Error>;

    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), sqlx::Error>;
}
