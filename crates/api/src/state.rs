use std::sync::Arc;

use carlot_core::pagination::{PaginationDefaults, DEFAULT_CURRENT_PAGE};
use carlot_db::store::CarItemStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Car catalog store (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn CarItemStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Pagination fallbacks for listing requests.
    pub fn pagination_defaults(&self) -> PaginationDefaults {
        PaginationDefaults {
            current_page: DEFAULT_CURRENT_PAGE,
            limit_items: self.config.default_page_size,
        }
    }
}
