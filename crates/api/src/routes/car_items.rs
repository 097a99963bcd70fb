//! Route definitions for the `/car_items` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::car_items;
use crate::state::AppState;

/// Routes mounted at `/car_items`.
///
/// ```text
/// GET    /                    -> list  (?keyword=&searchKey=&sortKey=&sortValue=&page=&limit=)
/// GET    /deleted             -> deleted
/// GET    /detail/{id}         -> detail
/// POST   /create              -> create
/// PATCH  /edit/{id}           -> edit
/// DELETE /delete/{id}         -> delete
/// PATCH  /change_multi        -> change_multi
/// GET    /count_by_segment    -> count_by_segment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(car_items::list))
        .route("/deleted", get(car_items::deleted))
        .route("/detail/{id}", get(car_items::detail))
        .route("/create", post(car_items::create))
        .route("/edit/{id}", patch(car_items::edit))
        .route("/delete/{id}", delete(car_items::delete))
        .route("/change_multi", patch(car_items::change_multi))
        .route("/count_by_segment", get(car_items::count_by_segment))
}
