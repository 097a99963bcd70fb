//! Car item entity model, projections and write DTOs.

use std::collections::BTreeMap;

use carlot_core::form::{NormalizedForm, PLACEHOLDER};
use carlot_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `car_items` table.
///
/// Equipment attributes serialize at the top level next to the core fields.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CarItem {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    pub version: String,
    pub price: String,
    pub vehicle_segment: String,
    #[sqlx(json)]
    #[serde(flatten)]
    pub equipment: BTreeMap<String, String>,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
    pub deleted: bool,
    #[serde(rename = "deletedAt")]
    pub deleted_at: Option<Timestamp>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

/// Listing projection used by `GET /api/car_items`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct CarItemSummary {
    pub id: DbId,
    pub name: String,
    pub brand: String,
    pub version: String,
    pub price: String,
    pub vehicle_segment: String,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
}

impl From<&CarItem> for CarItemSummary {
    fn from(item: &CarItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            brand: item.brand.clone(),
            version: item.version.clone(),
            price: item.price.clone(),
            vehicle_segment: item.vehicle_segment.clone(),
            image_urls: item.image_urls.clone(),
        }
    }
}

/// Projection used by the deleted-items listing. `image_urls` holds at most
/// the first image.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct DeletedCarItem {
    pub id: DbId,
    pub name: String,
    pub version: String,
    pub price: String,
    pub vehicle_segment: String,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
}

impl From<&CarItem> for DeletedCarItem {
    fn from(item: &CarItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            version: item.version.clone(),
            price: item.price.clone(),
            vehicle_segment: item.vehicle_segment.clone(),
            image_urls: item.image_urls.iter().take(1).cloned().collect(),
        }
    }
}

/// Number of live items in one vehicle segment.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SegmentCount {
    pub vehicle_segment: String,
    pub count: i64,
}

/// DTO for inserting a new car item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCarItem {
    pub name: String,
    pub brand: String,
    pub version: String,
    pub price: String,
    pub vehicle_segment: String,
    pub equipment: BTreeMap<String, String>,
    pub image_urls: Vec<String>,
}

impl NewCarItem {
    /// Split a normalized form into core columns and equipment.
    ///
    /// Core fields missing from the form get the placeholder.
    pub fn from_form(mut form: NormalizedForm, image_urls: Vec<String>) -> Self {
        let mut core = |name: &str| form.take(name).unwrap_or_else(|| PLACEHOLDER.to_string());
        let name = core("name");
        let brand = core("brand");
        let version = core("version");
        let price = core("price");
        let vehicle_segment = core("vehicle_segment");

        Self {
            name,
            brand,
            version,
            price,
            vehicle_segment,
            equipment: form.into_inner(),
            image_urls,
        }
    }
}

/// DTO for editing a car item. `None` core fields and absent equipment keys
/// are left untouched; `image_urls` replaces the stored list and is always
/// built by appending to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_segment: Option<String>,
    #[serde(flatten)]
    pub equipment: BTreeMap<String, String>,
    #[serde(rename = "imageUrl")]
    pub image_urls: Vec<String>,
}

impl CarItemPatch {
    pub fn from_form(mut form: NormalizedForm, image_urls: Vec<String>) -> Self {
        Self {
            name: form.take("name"),
            brand: form.take("brand"),
            version: form.take("version"),
            price: form.take("price"),
            vehicle_segment: form.take("vehicle_segment"),
            equipment: form.into_inner(),
            image_urls,
        }
    }

    /// Apply the patch to an in-memory item.
    pub fn apply_to(&self, item: &mut CarItem) {
        let fields = [
            (&self.name, &mut item.name),
            (&self.brand, &mut item.brand),
            (&self.version, &mut item.version),
            (&self.price, &mut item.price),
            (&self.vehicle_segment, &mut item.vehicle_segment),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
        item.equipment
            .extend(self.equipment.iter().map(|(k, v)| (k.clone(), v.clone())));
        item.image_urls.clone_from(&self.image_urls);
    }
}

/// Column a sort field orders by, when it names one. Other field names are
/// ordered by the equipment attribute of the same name.
pub fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "id" | "_id" => Some("id"),
        "name" => Some("name"),
        "brand" => Some("brand"),
        "version" => Some("version"),
        "price" => Some("price"),
        "vehicle_segment" => Some("vehicle_segment"),
        "deleted" => Some("deleted"),
        "deletedAt" | "deleted_at" => Some("deleted_at"),
        "createdAt" | "created_at" => Some("created_at"),
        "updatedAt" | "updated_at" => Some("updated_at"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use carlot_core::form::FormSchema;
    use serde_json::json;

    use super::*;

    fn form(value: serde_json::Value) -> NormalizedForm {
        let raw = value.as_object().cloned().unwrap_or_default();
        FormSchema::car_item().normalize(&raw)
    }

    #[test]
    fn new_item_splits_core_and_equipment() {
        let schema = FormSchema::car_item();
        let item = NewCarItem::from_form(
            schema.with_defaults(form(json!({ "name": "Vios", "abs_checked": "on" }))),
            vec![],
        );
        assert_eq!(item.name, "Vios");
        assert_eq!(item.brand, PLACEHOLDER);
        assert_eq!(item.equipment.get("abs").map(String::as_str), Some("true"));
        assert!(!item.equipment.contains_key("name"));
    }

    #[test]
    fn patch_serializes_only_submitted_fields() {
        let patch = CarItemPatch::from_form(
            form(json!({ "price": "500000000", "sunroof_checked": "off" })),
            vec!["a.jpg".into()],
        );
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            value,
            json!({ "price": "500000000", "sunroof": "false", "imageUrl": ["a.jpg"] })
        );
    }

    #[test]
    fn sort_column_maps_known_fields() {
        assert_eq!(sort_column("_id"), Some("id"));
        assert_eq!(sort_column("createdAt"), Some("created_at"));
        assert_eq!(sort_column("seats"), None);
        assert_eq!(sort_column("price; DROP TABLE car_items"), None);
    }
}
