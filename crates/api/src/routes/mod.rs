pub mod car_items;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /car_items                       list (GET)
/// /car_items/deleted               soft-deleted items (GET)
/// /car_items/detail/{id}           single item (GET)
/// /car_items/create                create (POST)
/// /car_items/edit/{id}             edit (PATCH)
/// /car_items/delete/{id}           soft delete (DELETE)
/// /car_items/change_multi          bulk state change (PATCH)
/// /car_items/count_by_segment      counts per vehicle segment (GET)
///
/// /user/register                   stub (POST)
/// /user/login                      stub (POST)
/// /user/password/reset             stub (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/car_items", car_items::router())
        .nest("/user", user::router())
}
