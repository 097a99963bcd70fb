//! Pure catalog logic shared by the store adapters and the HTTP layer.
//!
//! Nothing in this crate touches the network or a database: listing query
//! construction, pagination arithmetic, form normalization and bulk request
//! validation are all plain functions over their inputs.

pub mod bulk;
pub mod error;
pub mod form;
pub mod listing;
pub mod pagination;
pub mod types;
