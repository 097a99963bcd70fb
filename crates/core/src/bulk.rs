//! Validation of bulk state-change requests (`PATCH /change_multi`).

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// Operation type for a bulk soft-delete.
pub const DELETE_MULTI: &str = "delete-multi";

/// Recognised bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    DeleteMulti,
}

impl BulkAction {
    pub fn parse(kind: Option<&str>) -> Result<Self, CoreError> {
        match kind {
            Some(DELETE_MULTI) => Ok(Self::DeleteMulti),
            _ => Err(CoreError::Validation(
                "Invalid operation type provided.".into(),
            )),
        }
    }
}

/// A validated bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkChange {
    pub ids: Vec<DbId>,
    pub action: BulkAction,
}

impl BulkChange {
    /// Validate the raw `ids` and `type` of a request body.
    ///
    /// `ids` must be a non-empty array of integer ids (numeric strings are
    /// accepted). It is checked before the operation type.
    pub fn validate(ids: Option<&Value>, kind: Option<&str>) -> Result<Self, CoreError> {
        let ids = parse_ids(ids)?;
        let action = BulkAction::parse(kind)?;
        Ok(Self { ids, action })
    }
}

fn parse_ids(ids: Option<&Value>) -> Result<Vec<DbId>, CoreError> {
    let invalid = || CoreError::Validation("Invalid ids provided.".into());

    let items = match ids {
        Some(Value::Array(items)) if !items.is_empty() => items,
        _ => return Err(invalid()),
    };

    items
        .iter()
        .map(|item| match item {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<DbId>().ok(),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(invalid)
}
