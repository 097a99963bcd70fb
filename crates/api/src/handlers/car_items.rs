//! Handlers for the `/car_items` resource.
//!
//! Listing, detail, create, edit, soft delete, bulk state change and
//! segment counts. Form bodies go through [`FormSchema::car_item`] before
//! anything reaches the store.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use carlot_core::bulk::{BulkAction, BulkChange};
use carlot_core::error::CoreError;
use carlot_core::form::{append_image_urls, image_urls_for_create, FormSchema, RawForm};
use carlot_core::listing::{self, ListingParams};
use carlot_core::pagination;
use carlot_core::types::DbId;
use carlot_db::models::car_item::{
    CarItem, CarItemPatch, CarItemSummary, DeletedCarItem, NewCarItem, SegmentCount,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Body of the detail endpoint when nothing matches.
const NOT_FOUND_MESSAGE: &str = "Không tìm thấy";

/// Response body of the listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarListing {
    pub cars: Vec<CarItemSummary>,
    pub total_cars: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Request body for `PATCH /change_multi`.
#[derive(Debug, Deserialize)]
pub struct ChangeMultiRequest {
    pub ids: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
}

/// GET /api/car_items
///
/// Live items matching the search, sorted and paginated.
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListingParams>,
) -> AppResult<Json<CarListing>> {
    let query = listing::build(&params)?;
    let total = state.store.count(&query.filter).await?;

    let page = pagination::compute(
        state.pagination_defaults(),
        params.page.as_deref(),
        params.limit.as_deref(),
        total,
    );

    let cars = state
        .store
        .find(&query.filter, query.sort.as_ref(), page.window())
        .await?;

    Ok(Json(CarListing {
        cars,
        total_cars: total,
        total_pages: page.total_pages,
        current_page: page.current_page,
    }))
}

/// GET /api/car_items/deleted
pub async fn deleted(State(state): State<AppState>) -> AppResult<Json<Vec<DeletedCarItem>>> {
    let items = state.store.find_deleted().await?;
    Ok(Json(items))
}

/// GET /api/car_items/detail/{id}
///
/// A live item. Unknown, deleted and unparsable ids all answer 404 with a
/// bare JSON string instead of the error envelope.
pub async fn detail(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<Response> {
    let Ok(id) = id.trim().parse::<DbId>() else {
        return Ok(not_found());
    };

    match state.store.find_active(id).await? {
        Some(item) => Ok(Json(item).into_response()),
        None => Ok(not_found()),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(NOT_FOUND_MESSAGE)).into_response()
}

/// POST /api/car_items/create
///
/// Rejects a (version, name, brand) that any stored item already has.
pub async fn create(
    State(state): State<AppState>,
    ApiJson(raw): ApiJson<RawForm>,
) -> AppResult<Json<ApiResponse<CarItem>>> {
    let schema = FormSchema::car_item();
    let form = schema.with_defaults(schema.normalize(&raw));
    let input = NewCarItem::from_form(form, image_urls_for_create(&raw));

    let exists = state
        .store
        .exists_with_identity(&input.version, &input.name, &input.brand)
        .await?;
    if exists {
        return Err(AppError::Core(CoreError::Conflict("Trùng sản phẩm!".into())));
    }

    let created = state.store.insert(&input).await?;
    tracing::info!(car_item_id = created.id, "Car item created");

    Ok(Json(ApiResponse::ok("Tạo thành công", created)))
}

/// PATCH /api/car_items/edit/{id}
///
/// Writes only the submitted fields. Submitted images are appended to the
/// stored list.
pub async fn edit(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
    ApiJson(raw): ApiJson<RawForm>,
) -> AppResult<Json<ApiResponse<CarItemPatch>>> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "CarItem",
            id,
        })
    };

    let existing = state.store.find_by_id(id).await?.ok_or_else(not_found)?;

    let form = FormSchema::car_item().normalize(&raw);
    let patch = CarItemPatch::from_form(form, append_image_urls(existing.image_urls, &raw));

    if !state.store.update(id, &patch).await? {
        return Err(not_found());
    }
    tracing::info!(car_item_id = id, images = patch.image_urls.len(), "Car item edited");

    Ok(Json(ApiResponse::ok("Sửa xe thành công!", patch)))
}

/// DELETE /api/car_items/delete/{id}
///
/// Soft delete. Succeeds whether or not anything changed.
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let changed = state.store.soft_delete(id).await?;
    tracing::info!(car_item_id = id, changed, "Car item soft-deleted");

    Ok(Json(ApiResponse::message("Xóa thành công")))
}

/// PATCH /api/car_items/change_multi
///
/// Validates the whole request before touching any item.
pub async fn change_multi(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ChangeMultiRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    let change = BulkChange::validate(
        body.ids.as_ref(),
        body.kind.as_ref().and_then(Value::as_str),
    )?;

    match change.action {
        BulkAction::DeleteMulti => {
            let affected = state.store.soft_delete_many(&change.ids).await?;
            tracing::info!(
                requested = change.ids.len(),
                affected,
                "Bulk soft delete completed"
            );
        }
    }

    Ok(Json(ApiResponse::message(format!(
        "Xóa thành công {} xe.",
        change.ids.len()
    ))))
}

/// GET /api/car_items/count_by_segment
pub async fn count_by_segment(State(state): State<AppState>) -> AppResult<Json<Vec<SegmentCount>>> {
    let counts = state.store.count_by_segment().await?;
    Ok(Json(counts))
}
