//! Route definitions for the `/user` account stubs.

use axum::routing::post;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .route("/password/reset", post(user::reset_password))
}
