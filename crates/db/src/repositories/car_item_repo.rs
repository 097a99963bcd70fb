//! Repository for the `car_items` table.

use carlot_core::listing::{CarFilter, SortSpec};
use carlot_core::pagination::PageWindow;
use carlot_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::car_item::{
    sort_column, CarItem, CarItemPatch, CarItemSummary, DeletedCarItem, NewCarItem, SegmentCount,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, brand, version, price, vehicle_segment, equipment, \
    image_urls, deleted, deleted_at, created_at, updated_at";

/// Columns of the listing projection.
const SUMMARY_COLUMNS: &str = "id, name, brand, version, price, vehicle_segment, image_urls";

/// Provides CRUD operations for car items.
pub struct CarItemRepo;

impl CarItemRepo {
    /// Count rows matching a filter.
    pub async fn count(pool: &PgPool, filter: &CarFilter) -> Result<i64, sqlx::Error> {
        let (where_sql, _) = where_clause(filter);
        let query = format!("SELECT COUNT(*) FROM car_items {where_sql}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(filter.deleted);
        if let Some(ref search) = filter.search {
            q = q.bind(search.like_pattern());
        }
        q.fetch_one(pool).await
    }

    /// One page of the listing projection.
    ///
    /// Known columns sort directly; any other sort field orders by the
    /// equipment attribute of that name. Ties, and unsorted listings, fall
    /// back to insertion order.
    pub async fn find(
        pool: &PgPool,
        filter: &CarFilter,
        sort: Option<&SortSpec>,
        window: PageWindow,
    ) -> Result<Vec<CarItemSummary>, sqlx::Error> {
        let (where_sql, mut bind_idx) = where_clause(filter);

        let mut equipment_key = None;
        let order_clause = match sort {
            Some(spec) => {
                let dir = spec.direction.as_sql();
                match sort_column(&spec.field) {
                    Some(column) => format!("ORDER BY {column} {dir}, id ASC"),
                    None => {
                        let clause = format!("ORDER BY equipment ->> ${bind_idx} {dir}, id ASC");
                        bind_idx += 1;
                        equipment_key = Some(spec.field.as_str());
                        clause
                    }
                }
            }
            None => "ORDER BY id ASC".to_string(),
        };

        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM car_items \
             {where_sql} \
             {order_clause} \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, CarItemSummary>(&query).bind(filter.deleted);
        if let Some(ref search) = filter.search {
            q = q.bind(search.like_pattern());
        }
        if let Some(key) = equipment_key {
            q = q.bind(key);
        }
        q.bind(to_i64(window.limit))
            .bind(to_i64(window.skip))
            .fetch_all(pool)
            .await
    }

    /// Soft-deleted items, insertion order, first image only.
    pub async fn list_deleted(pool: &PgPool) -> Result<Vec<DeletedCarItem>, sqlx::Error> {
        sqlx::query_as::<_, DeletedCarItem>(
            "SELECT id, name, version, price, vehicle_segment, image_urls[1:1] AS image_urls \
             FROM car_items WHERE deleted = TRUE ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Find a live item by ID. Excludes soft-deleted rows.
    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_items WHERE id = $1 AND deleted = FALSE");
        sqlx::query_as::<_, CarItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item by ID, including soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_items WHERE id = $1");
        sqlx::query_as::<_, CarItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether any item, deleted or not, has this (version, name, brand).
    pub async fn exists_with_identity(
        pool: &PgPool,
        version: &str,
        name: &str,
        brand: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                 SELECT 1 FROM car_items WHERE version = $1 AND name = $2 AND brand = $3 \
             )",
        )
        .bind(version)
        .bind(name)
        .bind(brand)
        .fetch_one(pool)
        .await
    }

    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewCarItem) -> Result<CarItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_items \
                (name, brand, version, price, vehicle_segment, equipment, image_urls) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarItem>(&query)
            .bind(&input.name)
            .bind(&input.brand)
            .bind(&input.version)
            .bind(&input.price)
            .bind(&input.vehicle_segment)
            .bind(Json(&input.equipment))
            .bind(&input.image_urls)
            .fetch_one(pool)
            .await
    }

    /// Apply a patch. Only non-`None` core fields are written; equipment keys
    /// are merged. Returns `true` if a row was updated.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &CarItemPatch,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE car_items SET \
                 name = COALESCE($2, name), \
                 brand = COALESCE($3, brand), \
                 version = COALESCE($4, version), \
                 price = COALESCE($5, price), \
                 vehicle_segment = COALESCE($6, vehicle_segment), \
                 equipment = equipment || $7, \
                 image_urls = $8, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.brand)
        .bind(&patch.version)
        .bind(&patch.price)
        .bind(&patch.vehicle_segment)
        .bind(Json(&patch.equipment))
        .bind(&patch.image_urls)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete an item by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE car_items SET deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete every listed item. Returns the number of rows marked.
    pub async fn soft_delete_many(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE car_items SET deleted = TRUE, deleted_at = NOW(), updated_at = NOW() \
             WHERE id = ANY($1) AND deleted = FALSE",
        )
        .bind(ids)
        .execute(pool)
        .await?;
        tracing::debug!(
            requested = ids.len(),
            affected = result.rows_affected(),
            "Bulk soft delete applied"
        );
        Ok(result.rows_affected())
    }

    /// Live item counts grouped by vehicle segment.
    pub async fn count_by_segment(pool: &PgPool) -> Result<Vec<SegmentCount>, sqlx::Error> {
        sqlx::query_as::<_, SegmentCount>(
            "SELECT vehicle_segment, COUNT(*) AS count \
             FROM car_items WHERE deleted = FALSE \
             GROUP BY vehicle_segment",
        )
        .fetch_all(pool)
        .await
    }
}

/// Build the WHERE clause for a filter. Returns the clause and the next
/// free bind index. `$1` is always the `deleted` flag; `$2` is the search
/// pattern when present.
fn where_clause(filter: &CarFilter) -> (String, u32) {
    let mut conditions = vec!["deleted = $1".to_string()];
    let mut bind_idx = 2u32;

    if let Some(ref search) = filter.search {
        conditions.push(format!("{} ILIKE ${bind_idx}", search.field.column()));
        bind_idx += 1;
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_idx)
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
