//! Account endpoints. Routed so clients get a stable answer, but there is
//! no account model behind them. Request bodies are ignored.

use axum::Json;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// POST /api/user/register
pub async fn register() -> AppResult<Json<Value>> {
    Err(not_implemented("register"))
}

/// POST /api/user/login
pub async fn login() -> AppResult<Json<Value>> {
    Err(not_implemented("login"))
}

/// POST /api/user/password/reset
pub async fn reset_password() -> AppResult<Json<Value>> {
    Err(not_implemented("password reset"))
}

fn not_implemented(action: &str) -> AppError {
    AppError::NotImplemented(format!("User {action} is not available"))
}
