//! Listing query construction.
//!
//! Turns the raw query string of `GET /api/car_items` into a [`ListingQuery`]:
//! a filter (always excluding soft-deleted rows, optionally narrowed by a
//! case-insensitive substring search on one field) and an optional sort.

use serde::Deserialize;

use crate::error::CoreError;

/// Raw query parameters accepted by the listing endpoint.
///
/// Everything is kept as a string so malformed values degrade to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    /// Search term.
    pub keyword: Option<String>,
    /// `"brand"` or `"name"`; selects the field the term applies to.
    pub search_key: Option<String>,
    pub sort_key: Option<String>,
    pub sort_value: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Fields a search term may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Brand,
    Name,
}

impl SearchField {
    /// Map a `searchKey` value to a field. Only the two exact keys match.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "brand" => Some(Self::Brand),
            "name" => Some(Self::Name),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Brand => "brand",
            Self::Name => "name",
        }
    }
}

/// Case-insensitive substring match on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub field: SearchField,
    pub term: String,
}

impl SearchFilter {
    pub fn matches(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.term.to_lowercase())
    }

    /// `ILIKE` pattern matching the term literally anywhere in the value.
    pub fn like_pattern(&self) -> String {
        let mut escaped = String::with_capacity(self.term.len() + 2);
        escaped.push('%');
        for c in self.term.chars() {
            if matches!(c, '\\' | '%' | '_') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped.push('%');
        escaped
    }
}

/// Row filter for catalog queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarFilter {
    pub deleted: bool,
    pub search: Option<SearchFilter>,
}

impl CarFilter {
    /// Every live (not soft-deleted) item.
    pub fn active() -> Self {
        Self {
            deleted: false,
            search: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse the direction tokens document stores accept for a sort value.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Some(Self::Ascending),
            "desc" | "descending" | "-1" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Sort on a caller-named field. Field names are not allow-listed here;
/// the store decides how an unknown name is ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub filter: CarFilter,
    pub sort: Option<SortSpec>,
}

/// Build the filter and sort for a listing request.
///
/// Fails only when both sort parameters are present and the direction is not
/// a recognised token.
pub fn build(params: &ListingParams) -> Result<ListingQuery, CoreError> {
    let mut filter = CarFilter::active();

    let term = params
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(term) = term {
        if let Some(field) = params.search_key.as_deref().and_then(SearchField::from_key) {
            filter.search = Some(SearchFilter {
                field,
                term: term.to_string(),
            });
        }
    }

    let sort = match (
        non_blank(params.sort_key.as_deref()),
        non_blank(params.sort_value.as_deref()),
    ) {
        (Some(field), Some(value)) => {
            let direction = SortDirection::parse(value).ok_or_else(|| {
                CoreError::Validation(format!("Invalid sort value: {value}"))
            })?;
            Some(SortSpec {
                field: field.to_string(),
                direction,
            })
        }
        _ => None,
    };

    Ok(ListingQuery { filter, sort })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
