//! Normalization of submitted car item forms.
//!
//! Admin forms post a flat object of field values. Equipment fields come as
//! a pair: a checkbox `<field>_checked` (value `"on"` when ticked) and an
//! optional free-text `<field>` that overrides the checkbox when filled in.
//! Every declared field is resolved once, in schema order, using this
//! precedence:
//!
//! | submitted keys             | kind     | result                                         |
//! |----------------------------|----------|------------------------------------------------|
//! | `<f>_checked` (and `<f>`)  | checkbox | trimmed `<f>` if non-blank, else `"true"`/`"false"` |
//! | `<f>` only                 | any      | trimmed value if non-blank, else the default   |
//! | neither                    | any      | left out                                       |
//!
//! Keys outside the schema are dropped. Image URLs are not part of the
//! schema; see [`image_urls_for_create`] and [`append_image_urls`].

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Suffix marking the checkbox half of an equipment field.
pub const CHECKBOX_SUFFIX: &str = "_checked";

/// Value browsers submit for a ticked checkbox.
pub const CHECKBOX_ENABLED: &str = "on";

/// Stored for fields that are absent or blank ("Updating").
pub const PLACEHOLDER: &str = "Đang cập nhật";

/// Body key carrying the image URL list.
pub const IMAGE_URL_FIELD: &str = "imageUrl";

/// Raw submitted form body.
pub type RawForm = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    CheckboxWithOverride,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
}

const fn text(name: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind: FieldKind::Text,
        default: PLACEHOLDER,
    }
}

const fn checkbox(name: &'static str) -> FieldDescriptor {
    FieldDescriptor {
        name,
        kind: FieldKind::CheckboxWithOverride,
        default: PLACEHOLDER,
    }
}

/// Columns stored directly on the car item row. Every other schema field
/// lives in the item's equipment map.
pub const CORE_FIELDS: &[&str] = &["name", "brand", "version", "price", "vehicle_segment"];

/// Field schema of the car item form.
pub const CAR_ITEM_FIELDS: &[FieldDescriptor] = &[
    text("name"),
    text("brand"),
    text("version"),
    text("price"),
    text("vehicle_segment"),
    text("fuel_type"),
    text("transmission"),
    text("seats"),
    text("origin"),
    text("description"),
    checkbox("airbags"),
    checkbox("abs"),
    checkbox("cruise_control"),
    checkbox("sunroof"),
    checkbox("rear_camera"),
    checkbox("keyless_entry"),
];

/// An ordered set of field descriptors.
#[derive(Debug, Clone, Copy)]
pub struct FormSchema {
    fields: &'static [FieldDescriptor],
}

impl FormSchema {
    pub const fn new(fields: &'static [FieldDescriptor]) -> Self {
        Self { fields }
    }

    /// The car item form.
    pub const fn car_item() -> Self {
        Self::new(CAR_ITEM_FIELDS)
    }

    /// Resolve every declared field present in `raw`.
    pub fn normalize(&self, raw: &RawForm) -> NormalizedForm {
        let mut values = BTreeMap::new();

        for field in self.fields {
            let own = raw.get(field.name);
            let checkbox = match field.kind {
                FieldKind::CheckboxWithOverride => {
                    raw.get(&format!("{}{CHECKBOX_SUFFIX}", field.name))
                }
                FieldKind::Text => None,
            };

            let value = match (checkbox, own) {
                (Some(checkbox), companion) => checkbox_value(checkbox, companion),
                (None, Some(own)) => text_value(own).unwrap_or_else(|| field.default.to_string()),
                (None, None) => continue,
            };
            values.insert(field.name.to_string(), value);
        }

        NormalizedForm { values }
    }

    /// Fill every declared field missing from `form` with its default.
    pub fn with_defaults(&self, mut form: NormalizedForm) -> NormalizedForm {
        for field in self.fields {
            form.values
                .entry(field.name.to_string())
                .or_insert_with(|| field.default.to_string());
        }
        form
    }
}

/// Trimmed text if the value is a non-blank string.
fn text_value(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn checkbox_value(checkbox: &Value, companion: Option<&Value>) -> String {
    if let Some(text) = companion.and_then(text_value) {
        return text;
    }
    let enabled = checkbox.as_str() == Some(CHECKBOX_ENABLED);
    enabled.to_string()
}

/// Normalized field values keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedForm {
    values: BTreeMap<String, String>,
}

impl NormalizedForm {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.values
    }

    /// Take a core column value out of the form.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

/// String entries of a submitted image list. Anything but an array is
/// treated as no images.
pub fn submitted_image_urls(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Image list for a new item: the submitted array, or nothing.
pub fn image_urls_for_create(raw: &RawForm) -> Vec<String> {
    submitted_image_urls(raw.get(IMAGE_URL_FIELD))
}

/// Image list after an edit: existing entries first, then any newly
/// submitted URLs. Never replaces or deduplicates.
pub fn append_image_urls(existing: Vec<String>, raw: &RawForm) -> Vec<String> {
    let mut urls = existing;
    urls.extend(submitted_image_urls(raw.get(IMAGE_URL_FIELD)));
    urls
}
