//! In-process adapter holding items in a `Vec` behind a lock.
//!
//! Mirrors the PostgreSQL adapter's observable behaviour: ids are assigned
//! in increasing order, unsorted listings come back in insertion order,
//! and ascending sorts put missing equipment values last.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use async_trait::async_trait;
use carlot_core::listing::{CarFilter, SortDirection, SortSpec};
use carlot_core::pagination::PageWindow;
use carlot_core::types::{DbId, Timestamp};
use chrono::Utc;
use tokio::sync::RwLock;

use super::CarItemStore;
use crate::models::car_item::{
    sort_column, CarItem, CarItemPatch, CarItemSummary, DeletedCarItem, NewCarItem, SegmentCount,
};

#[derive(Debug, Default)]
struct State {
    items: Vec<CarItem>,
    last_id: DbId,
}

#[derive(Debug, Default)]
pub struct InMemoryCarItemStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl InMemoryCarItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Every stored item, deleted or not, in id order.
    pub async fn snapshot(&self) -> Vec<CarItem> {
        self.state.read().await.items.clone()
    }

    fn check_available(&self) -> Result<(), sqlx::Error> {
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            Err(sqlx::Error::PoolClosed)
        } else {
            Ok(())
        }
    }
}

fn matches(filter: &CarFilter, item: &CarItem) -> bool {
    if item.deleted != filter.deleted {
        return false;
    }
    match filter.search {
        Some(ref search) => {
            let value = match search.field.column() {
                "brand" => &item.brand,
                _ => &item.name,
            };
            search.matches(value)
        }
        None => true,
    }
}

#[derive(Debug, PartialEq, PartialOrd)]
enum SortValue<'a> {
    Id(DbId),
    Flag(bool),
    Text(Option<&'a str>),
    Time(Option<Timestamp>),
}

fn sort_value<'a>(item: &'a CarItem, field: &str) -> SortValue<'a> {
    match sort_column(field) {
        Some("id") => SortValue::Id(item.id),
        Some("name") => SortValue::Text(Some(&item.name)),
        Some("brand") => SortValue::Text(Some(&item.brand)),
        Some("version") => SortValue::Text(Some(&item.version)),
        Some("price") => SortValue::Text(Some(&item.price)),
        Some("vehicle_segment") => SortValue::Text(Some(&item.vehicle_segment)),
        Some("deleted") => SortValue::Flag(item.deleted),
        Some("deleted_at") => SortValue::Time(item.deleted_at),
        Some("created_at") => SortValue::Time(Some(item.created_at)),
        Some("updated_at") => SortValue::Time(Some(item.updated_at)),
        _ => SortValue::Text(item.equipment.get(field).map(String::as_str)),
    }
}

/// Ascending comparison with missing values after present ones.
fn compare(a: &SortValue<'_>, b: &SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => nulls_last(a.as_ref(), b.as_ref()),
        (SortValue::Time(a), SortValue::Time(b)) => nulls_last(a.as_ref(), b.as_ref()),
        _ => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn window<T>(items: Vec<T>, window: PageWindow) -> Vec<T> {
    let skip = usize::try_from(window.skip).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(limit).collect()
}

#[async_trait]
impl CarItemStore for InMemoryCarItemStore {
    async fn count(&self, filter: &CarFilter) -> Result<u64, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.items.iter().filter(|i| matches(filter, i)).count() as u64)
    }

    async fn find(
        &self,
        filter: &CarFilter,
        sort: Option<&SortSpec>,
        page: PageWindow,
    ) -> Result<Vec<CarItemSummary>, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut rows: Vec<&CarItem> = state.items.iter().filter(|i| matches(filter, i)).collect();

        if let Some(spec) = sort {
            // Stable sort keeps id order among equal keys.
            rows.sort_by(|a, b| {
                let ord = compare(&sort_value(a, &spec.field), &sort_value(b, &spec.field));
                match spec.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let rows = rows.into_iter().map(CarItemSummary::from).collect();
        Ok(window(rows, page))
    }

    async fn find_deleted(&self) -> Result<Vec<DeletedCarItem>, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|i| i.deleted)
            .map(DeletedCarItem::from)
            .collect())
    }

    async fn find_active(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.id == id && !i.deleted).cloned())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    async fn exists_with_identity(
        &self,
        version: &str,
        name: &str,
        brand: &str,
    ) -> Result<bool, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .any(|i| i.version == version && i.name == name && i.brand == brand))
    }

    async fn insert(&self, input: &NewCarItem) -> Result<CarItem, sqlx::Error> {
        self.check_available()?;
        let mut state = self.state.write().await;
        state.last_id += 1;
        let now = Utc::now();
        let item = CarItem {
            id: state.last_id,
            name: input.name.clone(),
            brand: input.brand.clone(),
            version: input.version.clone(),
            price: input.price.clone(),
            vehicle_segment: input.vehicle_segment.clone(),
            equipment: input.equipment.clone(),
            image_urls: input.image_urls.clone(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: DbId, patch: &CarItemPatch) -> Result<bool, sqlx::Error> {
        self.check_available()?;
        let mut state = self.state.write().await;
        match state.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                patch.apply_to(item);
                item.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        self.soft_delete_many(&[id]).await.map(|n| n > 0)
    }

    async fn soft_delete_many(&self, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for item in state
            .items
            .iter_mut()
            .filter(|i| !i.deleted && ids.contains(&i.id))
        {
            item.deleted = true;
            item.deleted_at = Some(now);
            item.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn count_by_segment(&self) -> Result<Vec<SegmentCount>, sqlx::Error> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut groups: BTreeMap<&str, i64> = BTreeMap::new();
        for item in state.items.iter().filter(|i| !i.deleted) {
            *groups.entry(item.vehicle_segment.as_str()).or_default() += 1;
        }
        Ok(groups
            .into_iter()
            .map(|(segment, count)| SegmentCount {
                vehicle_segment: segment.to_string(),
                count,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use carlot_core::listing::{SearchField, SearchFilter};

    use super::*;

    fn new_item(name: &str, brand: &str, segment: &str) -> NewCarItem {
        NewCarItem {
            name: name.to_string(),
            brand: brand.to_string(),
            version: "Base".to_string(),
            price: "1".to_string(),
            vehicle_segment: segment.to_string(),
            equipment: BTreeMap::new(),
            image_urls: vec![],
        }
    }

    fn all() -> PageWindow {
        PageWindow {
            skip: 0,
            limit: 100,
        }
    }

    async fn seeded() -> InMemoryCarItemStore {
        let store = InMemoryCarItemStore::new();
        store.insert(&new_item("Vios", "Toyota", "B")).await.unwrap();
        store.insert(&new_item("City", "Honda", "B")).await.unwrap();
        store.insert(&new_item("Camry", "Toyota", "D")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn ids_increase_from_one() {
        let store = seeded().await;
        let ids: Vec<_> = store.snapshot().await.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn search_filters_by_field() {
        let store = seeded().await;
        let filter = CarFilter {
            deleted: false,
            search: Some(SearchFilter {
                field: SearchField::Brand,
                term: "toyo".into(),
            }),
        };
        assert_eq!(store.count(&filter).await.unwrap(), 2);
        let names: Vec<_> = store
            .find(&filter, None, all())
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Vios", "Camry"]);
    }

    #[tokio::test]
    async fn sort_and_window() {
        let store = seeded().await;
        let sort = SortSpec {
            field: "name".into(),
            direction: SortDirection::Descending,
        };
        let page = store
            .find(
                &CarFilter::active(),
                Some(&sort),
                PageWindow { skip: 1, limit: 1 },
            )
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "City");
    }

    #[tokio::test]
    async fn missing_equipment_sorts_last_ascending() {
        let store = InMemoryCarItemStore::new();
        let mut with_seats = new_item("A", "X", "B");
        with_seats.equipment.insert("seats".into(), "5".into());
        store.insert(&new_item("B", "X", "B")).await.unwrap();
        store.insert(&with_seats).await.unwrap();

        let sort = SortSpec {
            field: "seats".into(),
            direction: SortDirection::Ascending,
        };
        let page = store
            .find(&CarFilter::active(), Some(&sort), all())
            .await
            .unwrap();
        assert_eq!(page[0].name, "A");
        assert_eq!(page[1].name, "B");
    }

    #[tokio::test]
    async fn soft_delete_stamps_once() {
        let store = seeded().await;
        assert!(store.soft_delete(1).await.unwrap());
        let first = store.find_by_id(1).await.unwrap().unwrap().deleted_at;
        assert!(first.is_some());

        assert!(!store.soft_delete(1).await.unwrap());
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap().deleted_at, first);
        assert!(store.find_active(1).await.unwrap().is_none());
        assert_eq!(store.find_deleted().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn soft_delete_many_skips_unknown_ids() {
        let store = seeded().await;
        assert_eq!(store.soft_delete_many(&[2, 3, 99]).await.unwrap(), 2);
        assert_eq!(store.count(&CarFilter::active()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn segment_counts_exclude_deleted() {
        let store = seeded().await;
        store.soft_delete(3).await.unwrap();
        let counts = store.count_by_segment().await.unwrap();
        assert_eq!(
            counts,
            vec![SegmentCount {
                vehicle_segment: "B".into(),
                count: 2,
            }]
        );
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = seeded().await;
        store.set_unavailable(true);
        assert!(store.ping().await.is_err());
        assert!(store.count(&CarFilter::active()).await.is_err());
        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
