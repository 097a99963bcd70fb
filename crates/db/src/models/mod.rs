//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - Projection structs for list endpoints
//! - Insert and patch DTOs built from normalized form input

pub mod car_item;
